//! Shared fixtures for the cross-crate tests under `tests/`.

use std::fs;
use std::path::Path;

use audio_backend::mock_backend::{MockAudioBackend, MockProbe};
use audio_system::{AudioConfig, AudioManager};
use tempfile::TempDir;

/// Bus layout used by most tests: `Master > {Music, Sfx > Ui}` plus a lone `Voice` root.
pub const MIXER_JSON: &str = r#"{
    // buses are declared parents-first
    "buses": [
        { "name": "Master", "defaultVolume": 1.0 },
        { "name": "Music", "parent": "Master", "defaultVolume": 0.8 },
        { "name": "Sfx", "parent": "Master" },
        { "name": "Ui", "parent": "Sfx", "defaultVolume": 0.3 },
        { "name": "Voice", "defaultVolume": 0.9 },
    ],
    "defaultBus": "Sfx",
}"#;

/// A temporary asset root.
pub struct AssetRoot {
    dir: TempDir,
}

impl AssetRoot {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("tempdir") }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a (fake) sound file under `Sounds/`.
    pub fn sound(&self, rel: &str) -> &Self {
        self.file(&format!("Sounds/{rel}"), b"RIFF\0\0\0\0WAVE")
    }

    pub fn file(&self, rel: &str, contents: &[u8]) -> &Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, contents).expect("write file");
        self
    }

    pub fn start(&self, config: &AudioConfig) -> (AudioManager, MockProbe) {
        let backend = MockAudioBackend::new();
        let probe = backend.probe();
        let manager =
            AudioManager::startup(Box::new(backend), self.path(), config).expect("audio startup");
        (manager, probe)
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::new()
    }
}

pub fn mixer_config() -> AudioConfig {
    AudioConfig::from_json_str(MIXER_JSON).expect("mixer config")
}
