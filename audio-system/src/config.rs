use std::path::Path;

use asset_manager::util::{DEFAULT_SOUND_CONFIG, DEFAULT_SOUND_FOLDER};
use asset_manager::{lenient_json, AssetError};
use serde::{Deserialize, Serialize};

use crate::AudioError;

/// Volume a bus starts at when its entry does not say.
pub const DEFAULT_BUS_VOLUME: f32 = 0.5;

/// Host-supplied audio configuration.
///
/// Every field has a default so a partial (or empty) document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioConfig {
    #[serde(alias = "Buses")]
    pub buses: Vec<BusConfig>,
    /// Bus used when a caller asks for "the default". Empty means the
    /// anonymous unity-volume bus.
    #[serde(alias = "DefaultBus")]
    pub default_bus: String,
    /// Folder scanned for sound files, relative to the asset root.
    #[serde(alias = "SoundFolder")]
    pub sound_folder: String,
    /// Per-sound overrides file, relative to the asset root. Empty disables it.
    #[serde(alias = "SoundConfig")]
    pub sound_config: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buses: Vec::new(),
            default_bus: String::new(),
            sound_folder: DEFAULT_SOUND_FOLDER.to_string(),
            sound_config: DEFAULT_SOUND_CONFIG.to_string(),
        }
    }
}

/// One bus declaration. Parents must be declared before their children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusConfig {
    #[serde(alias = "Name")]
    pub name: String,
    /// Empty for a root bus.
    #[serde(alias = "Parent")]
    pub parent: String,
    #[serde(alias = "DefaultVolume")]
    pub default_volume: f32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { name: String::new(), parent: String::new(), default_volume: DEFAULT_BUS_VOLUME }
    }
}

impl BusConfig {
    pub fn new(name: impl Into<String>, parent: impl Into<String>, default_volume: f32) -> Self {
        Self { name: name.into(), parent: parent.into(), default_volume }
    }

    pub fn root(name: impl Into<String>, default_volume: f32) -> Self {
        Self::new(name, "", default_volume)
    }
}

impl AudioConfig {
    /// Parse a config document. Comments and trailing commas are accepted.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        lenient_json::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let text = std::fs::read_to_string(path).map_err(AssetError::from)?;
        let config = Self::from_json_str(&text)
            .map_err(|source| AssetError::ConfigParse { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), buses = config.buses.len(), "audio config loaded");
        Ok(config)
    }
}
