//! Request authentication for the message exchange API.
//!
//! Every HTTP call carries a freshly minted token: an HMAC-SHA256 over the
//! mailbox credentials, a random nonce and the current UTC minute. Tokens
//! and header sets are built per call and never reused, retries included.

mod credentials;
mod headers;
mod token;

pub use credentials::Credentials;
pub use headers::{CallKind, ClientInfo, HeaderBuilder, OutboundMeta, RequestHeaders};
pub use token::{Token, compute_digest, format_timestamp, mint, mint_at};

/// Errors produced by the auth crate.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid shared key")]
    InvalidKey,
}
