//! Client error types.

use mesh_auth::AuthError;
use mesh_transfer::TransferError;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credentials or settings. Detected before any request.
    Configuration,
    /// Connection failure, timeout, TLS failure or local I/O.
    Transport,
    /// Unexpected status or malformed response.
    Protocol,
    /// A chunked transfer failed after at least one chunk succeeded.
    PartialTransfer,
}

/// Errors produced by the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("credential error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("transfer failed after {completed} of {total} chunks: {source}")]
    PartialTransfer {
        completed: u32,
        total: u32,
        source: Box<ClientError>,
    },
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) | Self::Auth(_) => ErrorKind::Configuration,
            Self::Http(_) | Self::Io(_) => ErrorKind::Transport,
            Self::Status { .. } | Self::Protocol(_) | Self::Json(_) => ErrorKind::Protocol,
            Self::Transfer(e) => match e {
                TransferError::Io(_) | TransferError::ShortPayload { .. } => ErrorKind::Transport,
                TransferError::EmptyPayload
                | TransferError::TooManyChunks { .. }
                | TransferError::InvalidMessageId(_) => ErrorKind::Configuration,
                TransferError::MissingTransferId { .. }
                | TransferError::MissingChunkRange { .. }
                | TransferError::InvalidChunkRange { .. }
                | TransferError::RangeNotAdvancing { .. }
                | TransferError::RangeSkipped { .. }
                | TransferError::InconsistentTotal { .. }
                | TransferError::Finished => ErrorKind::Protocol,
            },
            Self::PartialTransfer { .. } => ErrorKind::PartialTransfer,
        }
    }

    /// Wraps `self` as a partial-transfer failure when any chunk already
    /// succeeded.
    pub(crate) fn after_chunks(self, completed: u32, total: u32) -> Self {
        if completed == 0 {
            self
        } else {
            Self::PartialTransfer {
                completed,
                total,
                source: Box::new(self),
            }
        }
    }

    /// Innermost error, looking through [`ClientError::PartialTransfer`].
    pub fn root(&self) -> &ClientError {
        match self {
            Self::PartialTransfer { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            ClientError::Configuration("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ClientError::Auth(AuthError::MissingCredential("shared key")).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ClientError::Io(std::io::Error::other("disk")).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ClientError::Status {
                status: 403,
                body: String::new()
            }
            .kind(),
            ErrorKind::Protocol
        );
        assert_eq!(
            ClientError::Transfer(TransferError::EmptyPayload).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ClientError::Transfer(TransferError::MissingChunkRange { index: 1 }).kind(),
            ErrorKind::Protocol
        );
    }

    #[test]
    fn after_chunks_wraps_only_when_progress_was_made() {
        let first = ClientError::Protocol("boom".into()).after_chunks(0, 3);
        assert_eq!(first.kind(), ErrorKind::Protocol);

        let later = ClientError::Protocol("boom".into()).after_chunks(2, 3);
        assert_eq!(later.kind(), ErrorKind::PartialTransfer);
        assert!(matches!(later.root(), ClientError::Protocol(_)));
        assert_eq!(
            later.to_string(),
            "transfer failed after 2 of 3 chunks: protocol error: boom"
        );
    }
}
