//! Asset-side half of the audio layer: locating sound files under an asset
//! root, naming them, and reading the optional JSON configuration that sits
//! next to them.
pub mod asset_manager;
pub mod folder;
pub mod lenient_json;
pub mod sound_config;
pub mod util;

pub use asset_manager::{AssetManager, SoundEntry, SoundIngest};
pub use sound_config::{SoundConfig, SoundConfigEntry};
pub use util::AssetError;
