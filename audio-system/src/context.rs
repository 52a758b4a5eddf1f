use std::fmt;
use std::sync::Arc;

use audio_backend::AudioBackend;
use parking_lot::Mutex;

/// Shared handle to the running backend. Cloning is cheap; every clone talks
/// to the same engine.
#[derive(Clone)]
pub struct AudioContext {
    backend: Arc<Mutex<Box<dyn AudioBackend + Send>>>,
}

impl AudioContext {
    pub fn new(backend: Box<dyn AudioBackend + Send>) -> Self {
        Self { backend: Arc::new(Mutex::new(backend)) }
    }

    /// Run `f` with exclusive access to the backend.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn AudioBackend) -> R) -> R {
        let mut guard = self.backend.lock();
        f(&mut **guard)
    }
}

impl fmt::Debug for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioContext")
            .field("running", &self.backend.lock().is_running())
            .finish()
    }
}
