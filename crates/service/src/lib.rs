//! Orchestration on top of the exchange client.
//!
//! - [`MessageSender`]: handshake, then chunked upload.
//! - [`InboxPoller`]: drains the inbox in bounded batches. Each batch is
//!   downloaded with bounded concurrency, then the completed downloads are
//!   acknowledged. A single message's chunks are never fetched in parallel.

pub mod error;
pub mod receiver;
pub mod sender;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::ServiceError;
pub use receiver::InboxPoller;
pub use sender::MessageSender;
pub use types::{FailedMessage, PollConfig, PollReport};
