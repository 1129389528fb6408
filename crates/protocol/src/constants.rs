use std::time::Duration;

/// Authorization scheme name. The token follows after a single space.
pub const AUTH_SCHEME: &str = "NHSMESH";

/// Media type sent in the `accept` header of every call.
pub const ACCEPT_V2: &str = "application/vnd.mesh.v2+json";

/// Content type of outbound message bodies.
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Content encoding used for compressed chunks.
pub const ENCODING_GZIP: &str = "gzip";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default upload chunk size (10 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Sandbox base URL.
pub const DEFAULT_BASE_URL: &str = "https://localhost:8700";

/// Header names. All lowercase, as sent on the wire.
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_ENCODING: &str = "content-encoding";

    pub const CLIENT_VERSION: &str = "mex-clientversion";
    pub const OS_NAME: &str = "mex-osname";
    pub const OS_ARCHITECTURE: &str = "mex-osarchitecture";
    pub const OS_VERSION: &str = "mex-osversion";

    pub const FROM: &str = "mex-from";
    pub const TO: &str = "mex-to";
    pub const WORKFLOW_ID: &str = "mex-workflowid";
    pub const FILE_NAME: &str = "mex-filename";

    /// `"<index>:<total>"` on chunked writes and chunked read responses.
    pub const CHUNK_RANGE: &str = "mex-chunk-range";
}

/// Status codes the client consumes. Anything else is an error.
pub mod status {
    /// Handshake, standalone read, acknowledge.
    pub const OK: u16 = 200;
    /// Outbox write accepted.
    pub const ACCEPTED: u16 = 202;
    /// Chunked read, more data may follow.
    pub const PARTIAL_CONTENT: u16 = 206;
}
