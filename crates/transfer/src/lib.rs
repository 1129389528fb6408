//! Chunked message transfer: splitting, compression and transfer state.
//!
//! This crate performs no network I/O. The HTTP client drives the state
//! objects here one response at a time.

mod chunked;
mod types;
mod validation;

pub use chunked::{ChunkReader, Payload, compress, decompress, total_chunks};
pub use types::{Chunk, DownloadState, UploadState, UploadTarget};
pub use validation::validate_message_id;

pub use mesh_protocol::constants::DEFAULT_CHUNK_SIZE;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload of {size} bytes needs more than {max} chunks", max = u32::MAX)]
    TooManyChunks { size: u64 },

    #[error("payload ended at byte {offset}, expected {expected} bytes")]
    ShortPayload { offset: u64, expected: u64 },

    #[error("no transfer id known before chunk {index}")]
    MissingTransferId { index: u32 },

    #[error("partial response for chunk {index} has no chunk range")]
    MissingChunkRange { index: u32 },

    #[error("invalid chunk range {value:?}: {reason}")]
    InvalidChunkRange { value: String, reason: String },

    #[error("chunk range {got} does not advance past requested chunk {requested}")]
    RangeNotAdvancing { requested: u32, got: String },

    #[error("chunk range {got} skips requested chunk {requested}")]
    RangeSkipped { requested: u32, got: String },

    #[error("chunk total changed from {previous} to {got}")]
    InconsistentTotal { previous: u32, got: u32 },

    #[error("transfer already finished")]
    Finished,

    #[error("invalid message id: {0}")]
    InvalidMessageId(String),
}
