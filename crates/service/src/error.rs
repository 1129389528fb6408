//! Service error types.

use mesh_client::ClientError;

/// Errors produced by the orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid poll config: {0}")]
    InvalidConfig(String),
}
