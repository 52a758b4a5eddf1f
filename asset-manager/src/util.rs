use std::path::PathBuf;
use thiserror::Error;

/// File extensions recognised as sounds, compared without case.
pub const SOUND_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg"];

pub const DEFAULT_SOUND_FOLDER: &str = "Sounds";
pub const DEFAULT_SOUND_CONFIG: &str = "Sounds/config.json";

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
