// Contract between the audio integration layer and the engine that actually
// decodes, mixes and outputs sound. Everything above this crate talks to the
// backend only through `AudioBackend` and the opaque ids defined here.

use std::fmt;
use std::path::Path;
use std::time::Duration;

pub use glam::Vec3;

// The mock backend implementation lives in `src/mock_backend.rs`.
#[cfg(any(test, feature = "mock-audio"))]
pub mod mock_backend;

/// A specialized error type for audio backend failures.
#[derive(Debug)]
pub enum BackendError {
    /// An operation that needs a running backend was called before `startup`.
    NotStarted,
    DeviceNotFound,
    UnsupportedFormat(String),
    Decode(String),
    Io(std::io::Error),
    UnknownSound(SoundId),
    UnknownBus(BusId),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotStarted => write!(f, "audio backend not started"),
            BackendError::DeviceNotFound => write!(f, "no audio output device found"),
            BackendError::UnsupportedFormat(s) => write!(f, "unsupported format: {}", s),
            BackendError::Decode(s) => write!(f, "decode error: {}", s),
            BackendError::Io(e) => write!(f, "I/O error: {}", e),
            BackendError::UnknownSound(id) => write!(f, "unknown sound {}", id),
            BackendError::UnknownBus(id) => write!(f, "unknown bus {}", id),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackendError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(e: std::io::Error) -> Self {
        BackendError::Io(e)
    }
}

macro_rules! backend_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

backend_id!(
    /// Decoded (or stream-ready) sound data owned by the backend.
    SoundId,
    "sound"
);
backend_id!(
    /// A mixing node in the backend's bus graph.
    BusId,
    "bus"
);
backend_id!(
    /// One live playback of a sound.
    InstanceId,
    "instance"
);

/// How the backend should prepare a sound's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadingMethod {
    /// Decode the whole file up front and keep the samples in memory.
    #[default]
    Preload,
    /// Decode incrementally while the sound plays.
    Stream,
}

impl LoadingMethod {
    /// Parse a loading method name, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("preload") {
            Some(LoadingMethod::Preload)
        } else if s.eq_ignore_ascii_case("stream") {
            Some(LoadingMethod::Stream)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadingMethod::Preload => "Preload",
            LoadingMethod::Stream => "Stream",
        }
    }
}

impl fmt::Display for LoadingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a spatialized sound's position is in world space or relative to the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    Absolute,
    Relative,
}

/// Distance attenuation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttenuationModel {
    None,
    Inverse,
    Linear,
    Exponential,
}

/// Directional cone of a spatialized source. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCone {
    pub inner_angle: f32,
    pub outer_angle: f32,
    pub outer_gain: f32,
}

/// A single tunable of a live instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstanceParam {
    Volume(f32),
    Pitch(f32),
    Pan(f32),
    Looping(bool),
    LoopBegin(Duration),
    LoopEnd(Duration),
    LoopBeginFrames(u64),
    LoopEndFrames(u64),
    Spatialized(bool),
    Positioning(Positioning),
    Position(Vec3),
    Velocity(Vec3),
    Direction(Vec3),
    PinnedListener(u32),
    AttenuationModel(AttenuationModel),
    Rolloff(f32),
    MinGain(f32),
    MaxGain(f32),
    MinDistance(f32),
    MaxDistance(f32),
    Cone(SoundCone),
    DirectionalAttenuationFactor(f32),
    DopplerFactor(f32),
}

/// Represents the effective configuration of an audio device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub device_name: Option<String>,
}

/// A trait for backends that can provide additional information about the audio device.
pub trait DeviceInfoProvider {
    fn get_device_name(&self) -> Option<&str>;
    fn device_info(&self) -> DeviceInfo;
}

/// The core trait defining the audio backend's contract.
///
/// Calls are synchronous from the caller's point of view; a backend is free
/// to mix on its own thread internally. Instance operations on an id the
/// backend no longer knows about (already stopped, finished or never created)
/// are no-ops, so `stop` is always safe to call.
pub trait AudioBackend {
    fn startup(&mut self) -> Result<(), BackendError>;
    /// Per-frame housekeeping.
    fn update(&mut self);
    fn shutdown(&mut self);
    fn is_running(&self) -> bool;

    fn load_sound_path(
        &mut self,
        path: &Path,
        method: LoadingMethod,
    ) -> Result<SoundId, BackendError>;
    fn load_sound_bytes(
        &mut self,
        bytes: &[u8],
        method: LoadingMethod,
    ) -> Result<SoundId, BackendError>;

    fn create_bus(&mut self, name: &str, parent: Option<BusId>) -> Result<BusId, BackendError>;
    fn set_bus_volume(&mut self, bus: BusId, volume: f32);
    fn bus_volume(&self, bus: BusId) -> Option<f32>;

    /// Start a new instance of `sound`. `None` routes it straight to the master output.
    fn play(&mut self, sound: SoundId, bus: Option<BusId>) -> Result<InstanceId, BackendError>;
    fn set_param(&mut self, instance: InstanceId, param: InstanceParam);
    fn pitch(&self, instance: InstanceId) -> Option<f32>;
    fn cursor(&self, instance: InstanceId) -> Option<Duration>;
    fn set_cursor(&mut self, instance: InstanceId, cursor: Duration);
    fn pause(&mut self, instance: InstanceId);
    fn resume(&mut self, instance: InstanceId);
    fn stop(&mut self, instance: InstanceId);
    fn is_playing(&self, instance: InstanceId) -> bool;

    /// The "safe downcast" method to access specialized features.
    fn as_device_info_provider(&self) -> Option<&dyn DeviceInfoProvider> {
        None
    }
}

/// Runtime helper to determine if the `mock-audio` feature was enabled at
/// compile time for this crate.
pub fn is_mock_backend_enabled() -> bool {
    cfg!(feature = "mock-audio")
}

#[cfg(feature = "mock-audio")]
pub fn create_audio_backend() -> Box<dyn AudioBackend + Send> {
    Box::new(mock_backend::MockAudioBackend::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_method_parse_ignores_case() {
        assert_eq!(LoadingMethod::parse("stream"), Some(LoadingMethod::Stream));
        assert_eq!(LoadingMethod::parse("PRELOAD"), Some(LoadingMethod::Preload));
        assert_eq!(LoadingMethod::parse("Stream"), Some(LoadingMethod::Stream));
        assert_eq!(LoadingMethod::parse("lazy"), None);
        assert_eq!(LoadingMethod::default(), LoadingMethod::Preload);
    }

    #[test]
    fn ids_display_with_kind() {
        assert_eq!(SoundId(3).to_string(), "sound#3");
        assert_eq!(BusId(0).to_string(), "bus#0");
        assert_eq!(InstanceId(12).to_string(), "instance#12");
    }

    #[test]
    fn backend_error_wraps_io() {
        let e: BackendError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(e, BackendError::Io(_)));
        assert!(std::error::Error::source(&e).is_some());
        assert!(e.to_string().contains("gone"));
    }
}
