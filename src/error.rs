use thiserror::Error;

use crate::adapter::init::AppInitializerError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    InitializationError(#[from] AppInitializerError),
    #[error("Failed to start server: {0}")]
    ServerError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
