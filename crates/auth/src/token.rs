//! Single-use authentication tokens.
//!
//! ```text
//! message = mailbox:nonce:nonce_count:password:timestamp
//! digest  = hex(HMAC-SHA256(shared_key, message))
//! token   = "NHSMESH " mailbox:nonce:nonce_count:timestamp:digest
//! ```
//!
//! `timestamp` is the UTC time truncated to the minute as `YYYYMMDDHHMM`.
//! `nonce_count` is always 0 in this client; the server accepts it and the
//! counter is never advanced, even across retries.

use std::fmt;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use mesh_protocol::constants::AUTH_SCHEME;
use sha2::Sha256;

use crate::{AuthError, Credentials};

type HmacSha256 = Hmac<Sha256>;

/// A minted token. Render with `to_string()` for the `authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub mailbox_id: String,
    pub nonce: String,
    pub nonce_count: u32,
    pub timestamp: String,
    pub digest: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{AUTH_SCHEME} {}:{}:{}:{}:{}",
            self.mailbox_id, self.nonce, self.nonce_count, self.timestamp, self.digest
        )
    }
}

/// Mints a token for the current minute. A fresh UUID v4 nonce is generated
/// when `nonce` is `None`.
pub fn mint(
    credentials: &Credentials,
    nonce: Option<&str>,
    nonce_count: u32,
) -> Result<Token, AuthError> {
    mint_at(credentials, nonce, nonce_count, Utc::now())
}

/// Mints a token for an explicit instant.
pub fn mint_at(
    credentials: &Credentials,
    nonce: Option<&str>,
    nonce_count: u32,
    now: DateTime<Utc>,
) -> Result<Token, AuthError> {
    let nonce = match nonce {
        Some(n) => n.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };
    let timestamp = format_timestamp(now);
    let message = format!(
        "{}:{nonce}:{nonce_count}:{}:{timestamp}",
        credentials.mailbox_id(),
        credentials.mailbox_password()
    );
    let digest = compute_digest(credentials.shared_key(), &message)?;

    Ok(Token {
        mailbox_id: credentials.mailbox_id().to_string(),
        nonce,
        nonce_count,
        timestamp,
        digest,
    })
}

/// Formats `now` as `YYYYMMDDHHMM` (UTC, minute precision).
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M").to_string()
}

/// Hex-encoded HMAC-SHA256 of `message` keyed by `shared_key`.
pub fn compute_digest(shared_key: &str, message: &str) -> Result<String, AuthError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(shared_key.as_bytes())
        .map_err(|_| AuthError::InvalidKey)?;
    mac.update(message.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
