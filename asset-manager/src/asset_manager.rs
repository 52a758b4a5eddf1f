use std::path::{Path, PathBuf};

use audio_backend::LoadingMethod;
use serde::de::DeserializeOwned;

use crate::folder;
use crate::lenient_json;
use crate::sound_config::SoundConfig;
use crate::util::{AssetError, SOUND_EXTENSIONS};

/// Resolves asset paths against a root folder and reads what lives there.
#[derive(Debug, Clone)]
pub struct AssetManager {
    root: PathBuf,
}

impl AssetManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) path of an asset-relative path.
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root.join(rel)
    }

    /// Read and deserialize a JSON file relative to the root.
    /// A missing file is `Ok(None)`; a file that exists but does not parse is an error.
    pub fn read_json<T: DeserializeOwned>(
        &self,
        rel: impl AsRef<Path>,
    ) -> Result<Option<T>, AssetError> {
        let path = self.path(rel);
        if !path.is_file() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        lenient_json::from_str(&text)
            .map(Some)
            .map_err(|source| AssetError::ConfigParse { path, source })
    }

    /// Collect the sound files under `sound_folder` together with the optional
    /// per-sound overrides in `sound_config` (both relative to the root, an
    /// empty `sound_config` meaning "none").
    pub fn ingest_sounds(
        &self,
        sound_folder: &str,
        sound_config: &str,
    ) -> Result<SoundIngest, AssetError> {
        let folder = self.path(sound_folder);
        let files = folder::enumerate_files(&folder, SOUND_EXTENSIONS)?;
        let overrides = if sound_config.is_empty() {
            None
        } else {
            self.read_json::<SoundConfig>(sound_config)?
        };
        tracing::debug!(
            folder = %folder.display(),
            files = files.len(),
            overrides = overrides.as_ref().map_or(0, |c| c.entries.len()),
            "sound folder scanned"
        );
        Ok(SoundIngest { folder, files, overrides })
    }
}

/// Result of scanning the sound folder: candidate files in a stable order and
/// the override file, if one exists.
#[derive(Debug, Clone, Default)]
pub struct SoundIngest {
    pub folder: PathBuf,
    pub files: Vec<PathBuf>,
    pub overrides: Option<SoundConfig>,
}

/// A sound file with its derived name and resolved loading method.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundEntry {
    pub name: String,
    pub source_path: PathBuf,
    pub loading_method: LoadingMethod,
}

impl SoundIngest {
    pub fn entries(&self) -> impl Iterator<Item = SoundEntry> + '_ {
        self.files.iter().map(move |file| {
            let name = folder::asset_name(&self.folder, file);
            let loading_method = match &self.overrides {
                Some(cfg) => cfg.loading_method_for(&name),
                None => SoundConfig::DEFAULT_LOADING_METHOD,
            };
            SoundEntry { name, source_path: file.clone(), loading_method }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn ingest_applies_overrides_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Sounds/sub")).unwrap();
        fs::write(root.join("Sounds/a.wav"), b"RIFF").unwrap();
        fs::write(root.join("Sounds/sub/b.ogg"), b"OggS").unwrap();
        fs::write(
            root.join("Sounds/config.json"),
            r#"{ "entries": [ { "name": "sub/b", "loadingMethod": "Stream" } ] }"#,
        )
        .unwrap();

        let ingest = AssetManager::new(root).ingest_sounds("Sounds", "Sounds/config.json").unwrap();
        let entries: Vec<SoundEntry> = ingest.entries().collect();
        assert_eq!(entries.len(), 2);
        let a = entries.iter().find(|e| e.name == "a").unwrap();
        let b = entries.iter().find(|e| e.name == "sub/b").unwrap();
        assert_eq!(a.loading_method, LoadingMethod::Preload);
        assert_eq!(b.loading_method, LoadingMethod::Stream);
        assert_eq!(b.source_path, root.join("Sounds/sub/b.ogg"));
    }

    #[test]
    fn missing_folder_and_config_are_not_errors() {
        let dir = tempfile::tempdir().unwrap();
        let ingest = AssetManager::new(dir.path())
            .ingest_sounds("Sounds", "Sounds/config.json")
            .unwrap();
        assert!(ingest.files.is_empty());
        assert!(ingest.overrides.is_none());
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sounds")).unwrap();
        fs::write(dir.path().join("Sounds/config.json"), "{ entries: nope").unwrap();
        let err = AssetManager::new(dir.path())
            .ingest_sounds("Sounds", "Sounds/config.json")
            .unwrap_err();
        match err {
            AssetError::ConfigParse { path, .. } => assert!(path.ends_with("Sounds/config.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_config_path_means_no_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sounds")).unwrap();
        fs::write(dir.path().join("Sounds/config.json"), "not json at all").unwrap();
        let ingest = AssetManager::new(dir.path()).ingest_sounds("Sounds", "").unwrap();
        assert!(ingest.overrides.is_none());
    }
}
