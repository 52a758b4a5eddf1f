use audio_backend::LoadingMethod;
use serde::{Deserialize, Serialize};

/// Per-sound configuration file, usually `Sounds/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default, alias = "Entries")]
    pub entries: Vec<SoundConfigEntry>,
}

/// Configuration for a single sound file, matched by asset name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundConfigEntry {
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "LoadingMethod", with = "loading_method_serde")]
    pub loading_method: LoadingMethod,
}

impl SoundConfig {
    /// Used for every sound without an entry.
    pub const DEFAULT_LOADING_METHOD: LoadingMethod = LoadingMethod::Preload;

    pub fn entry(&self, name: &str) -> Option<&SoundConfigEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Loading method for `name`. The first matching entry wins.
    pub fn loading_method_for(&self, name: &str) -> LoadingMethod {
        self.entry(name)
            .map(|e| e.loading_method)
            .unwrap_or(Self::DEFAULT_LOADING_METHOD)
    }
}

mod loading_method_serde {
    use audio_backend::LoadingMethod;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(m: &LoadingMethod, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(m.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<LoadingMethod, D::Error> {
        let raw = String::deserialize(d)?;
        LoadingMethod::parse(&raw).ok_or_else(|| {
            D::Error::unknown_variant(&raw, &["Preload", "Stream"])
        })
    }
}
