//! Message exchange client.
//!
//! The core is the pair of chunked transfer state machines in [`upload`] and
//! [`download`]. Both run one request at a time over a [`Transport`] and build
//! a fresh header set (and so a fresh token) for every call. [`Client`] wraps
//! them together with the single-call mailbox operations.

mod client;
pub mod config;
pub mod download;
pub mod error;
mod mailbox;
pub mod transport;
pub mod upload;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use config::{ClientConfig, IdentityFiles, TlsConfig};
pub use download::{ChunkedDownloader, DownloadOutcome};
pub use error::{ClientError, ErrorKind};
pub use transport::{HttpTransport, Method, Request, Response, Transport};
pub use upload::{ChunkedUploader, OutboundMessage};

pub use mesh_auth::{AuthError, ClientInfo, Credentials};
pub use mesh_protocol::InboxResponse;
pub use mesh_transfer::{Payload, TransferError};
