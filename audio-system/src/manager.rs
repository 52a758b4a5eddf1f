use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use asset_manager::AssetManager;
use audio_backend::AudioBackend;
use tracing::{debug, info};

use crate::bus::{Bus, BusRegistry};
use crate::config::AudioConfig;
use crate::context::AudioContext;
use crate::instance::SoundInstance;
use crate::sound::{Sound, SoundRegistry, FALLBACK_SOUND};
use crate::AudioError;

/// Where a new playback is routed.
#[derive(Debug, Clone, Default)]
pub enum BusSelector {
    /// Straight to the master output.
    #[default]
    Unrestricted,
    /// Looked up by name; unknown names fall back to the default bus.
    Named(String),
    Bus(Arc<Bus>),
}

impl From<&str> for BusSelector {
    fn from(name: &str) -> Self {
        BusSelector::Named(name.to_string())
    }
}

impl From<String> for BusSelector {
    fn from(name: String) -> Self {
        BusSelector::Named(name)
    }
}

impl From<Option<&str>> for BusSelector {
    fn from(name: Option<&str>) -> Self {
        name.map_or(BusSelector::Unrestricted, BusSelector::from)
    }
}

impl From<Option<String>> for BusSelector {
    fn from(name: Option<String>) -> Self {
        name.map_or(BusSelector::Unrestricted, BusSelector::Named)
    }
}

impl From<Arc<Bus>> for BusSelector {
    fn from(bus: Arc<Bus>) -> Self {
        BusSelector::Bus(bus)
    }
}

impl From<&Arc<Bus>> for BusSelector {
    fn from(bus: &Arc<Bus>) -> Self {
        BusSelector::Bus(bus.clone())
    }
}

/// Entry point of the audio layer: owns the backend, the bus registry and the
/// sound registry. Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct AudioManager {
    inner: Arc<ManagerInner>,
}

#[derive(Debug)]
struct ManagerInner {
    ctx: AudioContext,
    assets: AssetManager,
    buses: BusRegistry,
    sounds: SoundRegistry,
    running: AtomicBool,
}

impl AudioManager {
    /// Start `backend`, build the buses from `config` and load every sound
    /// under `config.sound_folder`, with `root` as the asset root.
    pub fn startup(
        backend: Box<dyn AudioBackend + Send>,
        root: impl Into<PathBuf>,
        config: &AudioConfig,
    ) -> Result<Self, AudioError> {
        Self::startup_with_fallback(backend, root, config, FALLBACK_SOUND)
    }

    /// Like [`Self::startup`] with caller-supplied fallback sound bytes.
    pub fn startup_with_fallback(
        backend: Box<dyn AudioBackend + Send>,
        root: impl Into<PathBuf>,
        config: &AudioConfig,
        fallback: &[u8],
    ) -> Result<Self, AudioError> {
        let ctx = AudioContext::new(backend);
        ctx.with(|b| b.startup())?;
        ctx.with(|b| {
            if let Some(info) = b.as_device_info_provider().map(|p| p.device_info()) {
                info!(
                    device = info.device_name.as_deref().unwrap_or("<unknown>"),
                    sample_rate = info.sample_rate,
                    channels = info.channels,
                    "audio backend started"
                );
            }
        });

        let assets = AssetManager::new(root);
        let (buses, sounds) = match build_registries(&ctx, &assets, config, fallback) {
            Ok(registries) => registries,
            Err(e) => {
                ctx.with(|b| b.shutdown());
                return Err(e);
            }
        };

        info!(
            root = %assets.root().display(),
            buses = buses.len(),
            sounds = sounds.len(),
            "audio manager started"
        );
        Ok(Self {
            inner: Arc::new(ManagerInner {
                ctx,
                assets,
                buses,
                sounds,
                running: AtomicBool::new(true),
            }),
        })
    }

    pub fn context(&self) -> &AudioContext {
        &self.inner.ctx
    }

    pub fn assets(&self) -> &AssetManager {
        &self.inner.assets
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Per-frame tick; does nothing after shutdown.
    pub fn update(&self) {
        if self.is_running() {
            self.inner.ctx.with(|b| b.update());
        }
    }

    /// Stop the backend. Safe to call more than once.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    pub fn buses(&self) -> &BusRegistry {
        &self.inner.buses
    }

    pub fn sounds(&self) -> &SoundRegistry {
        &self.inner.sounds
    }

    /// See [`SoundRegistry::get`].
    pub fn get_sound(&self, name: &str) -> Arc<Sound> {
        self.inner.sounds.get(name)
    }

    pub fn fallback_sound(&self) -> Arc<Sound> {
        self.inner.sounds.fallback().clone()
    }

    /// See [`BusRegistry::get_or_fallback`].
    pub fn get_bus(&self, name: &str) -> Arc<Bus> {
        self.inner.buses.get_or_fallback(name)
    }

    /// See [`BusRegistry::resolve`].
    pub fn resolve_bus(&self, name: Option<&str>) -> Option<Arc<Bus>> {
        self.inner.buses.resolve(name)
    }

    pub fn set_bus_volume(&self, bus: &Bus, volume: f32) {
        debug!(bus = %bus.name(), volume, "bus volume set");
        self.inner.ctx.with(|b| b.set_bus_volume(bus.id(), volume));
    }

    pub fn bus_volume(&self, bus: &Bus) -> Option<f32> {
        self.inner.ctx.with(|b| b.bus_volume(bus.id()))
    }

    /// Start a new instance of `sound` routed to `bus`.
    pub fn play(
        &self,
        sound: &Sound,
        bus: impl Into<BusSelector>,
    ) -> Result<SoundInstance, AudioError> {
        if !self.is_running() {
            return Err(AudioError::ShutDown);
        }
        let bus = match bus.into() {
            BusSelector::Unrestricted => None,
            BusSelector::Named(name) => Some(self.get_bus(&name)),
            BusSelector::Bus(bus) => Some(bus),
        };
        let id = self.inner.ctx.with(|b| b.play(sound.id(), bus.as_ref().map(|bus| bus.id())))?;
        debug!(
            sound = %sound.name(),
            bus = bus.as_ref().map_or("<master>", |b| b.name()),
            instance = %id,
            "sound started"
        );
        Ok(SoundInstance::new(id, self.inner.ctx.clone()))
    }
}

impl ManagerInner {
    fn shutdown(&self) {
        if self.running.swap(false, Ordering::AcqRel) {
            self.ctx.with(|b| b.shutdown());
            info!("audio manager shut down");
        }
    }
}

impl Drop for ManagerInner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn build_registries(
    ctx: &AudioContext,
    assets: &AssetManager,
    config: &AudioConfig,
    fallback: &[u8],
) -> Result<(BusRegistry, SoundRegistry), AudioError> {
    let buses = BusRegistry::build(ctx, config)?;
    let ingest = assets.ingest_sounds(&config.sound_folder, &config.sound_config)?;
    let sounds = SoundRegistry::build(ctx, fallback, &ingest)?;
    Ok((buses, sounds))
}
