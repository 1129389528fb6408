//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use mesh_auth::ClientInfo;
pub use mesh_protocol::constants::{DEFAULT_BASE_URL, DEFAULT_CHUNK_SIZE, DEFAULT_REQUEST_TIMEOUT};

/// Settings for one [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base URL, e.g. `https://localhost:8700`.
    pub base_url: String,
    /// Applies to each HTTP call, not to a whole transfer.
    pub timeout: Duration,
    /// Raw bytes per uploaded chunk.
    pub chunk_size: usize,
    pub tls: TlsConfig,
    pub client_info: ClientInfo,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            tls: TlsConfig::default(),
            client_info: ClientInfo::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// TLS settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Skips server certificate verification. Sandbox only.
    pub accept_invalid_certs: bool,
    /// Client certificate for mutual TLS.
    pub identity: Option<IdentityFiles>,
    /// Extra trusted root, PEM.
    pub ca_cert: Option<PathBuf>,
}

/// PEM files making up a client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}
