//! Wire protocol for the mailbox message exchange API.
//!
//! Header names, media types, status codes, endpoint paths and the JSON
//! bodies exchanged with the service. No I/O happens here.

pub mod constants;
pub mod endpoints;
pub mod types;

// Re-export primary types for convenience.
pub use endpoints::Endpoints;
pub use types::{ChunkRange, ChunkRangeError, InboxResponse, SendMessageResponse};
