use std::path::Path;

use mesh_auth::{Credentials, HeaderBuilder};
use mesh_protocol::Endpoints;
use mesh_transfer::{Payload, validate_message_id};
use tracing::warn;

use crate::config::ClientConfig;
use crate::download::{ChunkedDownloader, DownloadOutcome};
use crate::error::ClientError;
use crate::transport::{HttpTransport, Transport};
use crate::upload::{ChunkedUploader, OutboundMessage};

/// Exchange client bound to one mailbox.
///
/// Cheap to share by reference across concurrent transfers; each transfer
/// keeps its own state.
pub struct Client<T = HttpTransport> {
    pub(crate) transport: T,
    pub(crate) endpoints: Endpoints,
    pub(crate) headers: HeaderBuilder,
    pub(crate) credentials: Credentials,
    chunk_size: usize,
}

impl Client<HttpTransport> {
    /// Creates a client over HTTPS using `config`.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self, ClientError> {
        check_base_url(&config.base_url)?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport, config, credentials))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(transport: T, config: &ClientConfig, credentials: Credentials) -> Self {
        Self {
            transport,
            endpoints: Endpoints::new(&config.base_url),
            headers: HeaderBuilder::new(config.client_info.clone()),
            credentials,
            chunk_size: config.chunk_size,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn mailbox_id(&self) -> &str {
        self.credentials.mailbox_id()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn uploader(&self) -> ChunkedUploader<'_> {
        ChunkedUploader::new(&self.transport, &self.endpoints, &self.headers, self.chunk_size)
    }

    pub fn downloader(&self) -> ChunkedDownloader<'_> {
        ChunkedDownloader::new(&self.transport, &self.endpoints, &self.headers)
    }

    /// Chunked upload from this mailbox. Returns the transfer id.
    pub async fn upload(
        &self,
        message: &OutboundMessage,
        payload: Payload,
    ) -> Result<String, ClientError> {
        self.uploader()
            .upload(&self.credentials, message, payload)
            .await
    }

    /// Chunked download into `sink`.
    pub async fn download<W>(
        &self,
        message_id: &str,
        sink: &mut W,
    ) -> Result<DownloadOutcome, ClientError>
    where
        W: tokio::io::AsyncWrite + Unpin + ?Sized,
    {
        self.downloader()
            .download(&self.credentials, message_id, sink)
            .await
    }

    /// Downloads into a new file at `path`. The file is removed if the
    /// download fails.
    pub async fn download_to_file(
        &self,
        message_id: &str,
        path: &Path,
    ) -> Result<DownloadOutcome, ClientError> {
        validate_message_id(message_id)?;
        let mut file = tokio::fs::File::create(path).await?;
        let result = self.download(message_id, &mut file).await;
        drop(file);

        if result.is_err()
            && let Err(e) = tokio::fs::remove_file(path).await
        {
            warn!(path = %path.display(), error = %e, "failed to remove partial download");
        }
        result
    }
}

fn check_base_url(base_url: &str) -> Result<(), ClientError> {
    if base_url.starts_with("https://") || base_url.starts_with("http://") {
        Ok(())
    } else {
        Err(ClientError::Configuration(format!(
            "base URL must start with http:// or https://: {base_url:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::testing::ScriptedTransport;
    use crate::transport::Response;

    fn creds() -> Credentials {
        Credentials::new("X26ABC1", "password", "TestKey").unwrap()
    }

    fn client(transport: ScriptedTransport) -> Client<ScriptedTransport> {
        let config = ClientConfig::new("https://mesh.test/");
        Client::with_transport(transport, &config, creds())
    }

    #[test]
    fn rejects_base_url_without_scheme() {
        let config = ClientConfig::new("mesh.test");
        let err = Client::new(&config, creds()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn upload_then_download_through_facade() {
        let transport = ScriptedTransport::new();
        transport
            .push(Response::new(202, r#"{"message_id":"T1"}"#))
            .push(Response::new(200, "payload"));
        let client = client(transport);

        let message = OutboundMessage::new("X26ABC2", "WF", "a.txt");
        let id = client
            .upload(&message, Payload::from_bytes(b"payload".to_vec()))
            .await
            .unwrap();
        assert_eq!(id, "T1");

        let mut sink = Vec::new();
        client.download("T1", &mut sink).await.unwrap();
        assert_eq!(sink, b"payload");
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn download_to_file_writes_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("M1.dat");

        let transport = ScriptedTransport::new();
        transport
            .push(Response::new(206, "ab").with_header("mex-chunk-range", "1:2"))
            .push(Response::new(206, "cd").with_header("mex-chunk-range", "2:2"));
        let client = client(transport);

        let outcome = client.download_to_file("M1", &path).await.unwrap();
        assert_eq!(outcome.chunk_count, 2);
        assert_eq!(std::fs::read(&path).unwrap(), b"abcd");
    }

    #[tokio::test]
    async fn failed_download_to_file_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("M1.dat");

        let transport = ScriptedTransport::new();
        transport
            .push(Response::new(206, "ab").with_header("mex-chunk-range", "1:2"))
            .push(Response::new(500, "oops"));
        let client = client(transport);

        let err = client.download_to_file("M1", &path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PartialTransfer);
        assert!(!path.exists());
    }
}
