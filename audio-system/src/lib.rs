//! Runtime side of the audio layer.
//!
//! [`AudioManager`] starts a backend, builds the bus hierarchy from an
//! [`AudioConfig`] and loads every sound found in the sound folder. Sounds are
//! then played either directly through the manager or through a
//! [`SoundPlayer`], which adds pooling, pitch jitter, parameter overrides and
//! pause/resume on top of a single instance.

pub mod bus;
pub mod config;
pub mod context;
pub mod error;
pub mod instance;
pub mod manager;
pub mod overlay;
pub mod player;
pub mod pool;
pub mod sound;

pub use bus::{Bus, BusRegistry};
pub use config::{AudioConfig, BusConfig};
pub use context::AudioContext;
pub use error::AudioError;
pub use instance::SoundInstance;
pub use manager::{AudioManager, BusSelector};
pub use overlay::PlaybackOverrides;
pub use player::{PlaybackState, SoundPlayer, SoundSelection};
pub use pool::{SoundPool, WeightedSoundPool};
pub use sound::{Sound, SoundOrigin, SoundRegistry};

pub use audio_backend::{AudioBackend, LoadingMethod, Vec3};
