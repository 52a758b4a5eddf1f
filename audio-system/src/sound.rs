use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use asset_manager::SoundIngest;
use audio_backend::{LoadingMethod, SoundId};
use tracing::{debug, info, warn};

use crate::context::AudioContext;
use crate::AudioError;

/// Short tone bundled with the crate, handed out for names that do not resolve.
pub static FALLBACK_SOUND: &[u8] = include_bytes!("../assets/fallback.wav");

pub const FALLBACK_SOUND_NAME: &str = "<fallback>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundOrigin {
    /// Loaded from bytes compiled into the binary.
    Embedded,
    File(PathBuf),
}

/// A sound loaded into the backend, identified by its asset name.
#[derive(Debug)]
pub struct Sound {
    name: String,
    id: SoundId,
    loading_method: LoadingMethod,
    origin: SoundOrigin,
}

impl Sound {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> SoundId {
        self.id
    }

    pub fn loading_method(&self) -> LoadingMethod {
        self.loading_method
    }

    pub fn origin(&self) -> &SoundOrigin {
        &self.origin
    }

    pub fn source_path(&self) -> Option<&Path> {
        match &self.origin {
            SoundOrigin::File(path) => Some(path),
            SoundOrigin::Embedded => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == SoundOrigin::Embedded
    }
}

#[derive(Debug)]
pub struct SoundRegistry {
    sounds: HashMap<String, Arc<Sound>>,
    fallback: Arc<Sound>,
}

impl SoundRegistry {
    /// Load the fallback sound and every file in `ingest`.
    ///
    /// A file the backend refuses is logged and skipped. Failing to load the
    /// fallback is an error.
    pub fn build(
        ctx: &AudioContext,
        fallback_bytes: &[u8],
        ingest: &SoundIngest,
    ) -> Result<Self, AudioError> {
        let fallback_id = ctx
            .with(|backend| backend.load_sound_bytes(fallback_bytes, LoadingMethod::Preload))
            .map_err(AudioError::FallbackSound)?;
        let fallback = Arc::new(Sound {
            name: FALLBACK_SOUND_NAME.to_string(),
            id: fallback_id,
            loading_method: LoadingMethod::Preload,
            origin: SoundOrigin::Embedded,
        });

        let mut sounds = HashMap::new();
        let mut skipped = 0usize;
        for entry in ingest.entries() {
            let loaded = ctx.with(|backend| {
                backend.load_sound_path(&entry.source_path, entry.loading_method)
            });
            let id = match loaded {
                Ok(id) => id,
                Err(e) => {
                    warn!(
                        sound = %entry.name,
                        path = %entry.source_path.display(),
                        error = %e,
                        "failed to load sound; skipping"
                    );
                    skipped += 1;
                    continue;
                }
            };
            debug!(sound = %entry.name, method = %entry.loading_method, %id, "sound loaded");
            let sound = Arc::new(Sound {
                name: entry.name.clone(),
                id,
                loading_method: entry.loading_method,
                origin: SoundOrigin::File(entry.source_path),
            });
            if sounds.insert(entry.name.clone(), sound).is_some() {
                warn!(sound = %entry.name, "two files share this name; keeping the last one");
            }
        }

        info!(sounds = sounds.len(), skipped, "sound registry built");
        Ok(Self { sounds, fallback })
    }

    /// The named sound, or the fallback sound (with a warning) when the name is unknown.
    pub fn get(&self, name: &str) -> Arc<Sound> {
        match self.sounds.get(name) {
            Some(sound) => sound.clone(),
            None => {
                warn!(sound = %name, "unknown sound; using the fallback sound");
                self.fallback.clone()
            }
        }
    }

    pub fn try_get(&self, name: &str) -> Option<Arc<Sound>> {
        self.sounds.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    pub fn fallback(&self) -> &Arc<Sound> {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Loaded sounds in no particular order. The fallback is not included.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Sound>> + '_ {
        self.sounds.values()
    }

    /// Sound names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sounds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
