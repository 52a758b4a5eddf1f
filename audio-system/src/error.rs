use asset_manager::AssetError;
use audio_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("audio backend error: {0}")]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// The bundled fallback sound could not be loaded. Without it there is
    /// nothing to hand out for unknown names, so startup aborts.
    #[error("failed to load the fallback sound: {0}")]
    FallbackSound(#[source] BackendError),
    /// A bus names a parent that is not declared before it in the config.
    #[error("bus '{bus}' names parent '{parent}', which is not declared before it")]
    UnknownParentBus { bus: String, parent: String },
    #[error("audio manager is shut down")]
    ShutDown,
}
