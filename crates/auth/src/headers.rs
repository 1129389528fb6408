//! Request header sets.
//!
//! [`HeaderBuilder::build`] mints a new token on every call. A header set
//! belongs to exactly one HTTP request.

use mesh_protocol::ChunkRange;
use mesh_protocol::constants::{
    ACCEPT_V2, CONTENT_TYPE_OCTET_STREAM, ENCODING_GZIP, headers as h,
};

use crate::{AuthError, Credentials, token};

/// Client identification sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub client_version: String,
    pub os_name: String,
    pub os_architecture: String,
    pub os_version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            client_version: format!("mesh-client-rs=={}", env!("CARGO_PKG_VERSION")),
            os_name: std::env::consts::OS.to_string(),
            os_architecture: std::env::consts::ARCH.to_string(),
            os_version: "unknown".to_string(),
        }
    }
}

/// Metadata for an outbound (outbox) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMeta {
    /// Destination mailbox.
    pub to: String,
    pub workflow_id: String,
    pub file_name: String,
    /// Present on chunked writes only.
    pub chunk_range: Option<ChunkRange>,
    /// Adds `content-encoding: gzip`.
    pub compressed: bool,
}

/// What kind of call the headers are for.
#[derive(Debug, Clone, Copy)]
pub enum CallKind<'a> {
    /// Reads, handshake, acknowledge.
    Inbound,
    /// Outbox writes.
    Outbound(&'a OutboundMeta),
}

/// Ordered header name/value pairs for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestHeaders {
    entries: Vec<(&'static str, String)>,
}

impl RequestHeaders {
    /// Sets `name`, replacing any existing value.
    pub fn insert(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds fresh header sets for exchange API calls.
#[derive(Debug, Clone, Default)]
pub struct HeaderBuilder {
    client: ClientInfo,
}

impl HeaderBuilder {
    pub fn new(client: ClientInfo) -> Self {
        Self { client }
    }

    pub fn client_info(&self) -> &ClientInfo {
        &self.client
    }

    /// Builds the full header set for one request.
    pub fn build(
        &self,
        credentials: &Credentials,
        kind: CallKind<'_>,
    ) -> Result<RequestHeaders, AuthError> {
        let token = token::mint(credentials, None, 0)?;

        let mut headers = RequestHeaders::default();
        headers.insert(h::ACCEPT, ACCEPT_V2);
        headers.insert(h::AUTHORIZATION, token.to_string());
        headers.insert(h::CLIENT_VERSION, self.client.client_version.as_str());
        headers.insert(h::OS_NAME, self.client.os_name.as_str());
        headers.insert(h::OS_ARCHITECTURE, self.client.os_architecture.as_str());
        headers.insert(h::OS_VERSION, self.client.os_version.as_str());

        if let CallKind::Outbound(meta) = kind {
            headers.insert(h::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM);
            headers.insert(h::FROM, credentials.mailbox_id());
            headers.insert(h::TO, meta.to.as_str());
            headers.insert(h::WORKFLOW_ID, meta.workflow_id.as_str());
            headers.insert(h::FILE_NAME, meta.file_name.as_str());
            if let Some(range) = meta.chunk_range {
                headers.insert(h::CHUNK_RANGE, range.to_string());
            }
            if meta.compressed {
                headers.insert(h::CONTENT_ENCODING, ENCODING_GZIP);
            }
        }

        Ok(headers)
    }
}
