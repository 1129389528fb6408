//! Chunked download.
//!
//! The first read of a message answers either `200` (standalone, complete)
//! or `206` with `mex-chunk-range: <index>:<total>`. Further chunks are
//! fetched one at a time until a range reports `index == total`. Bodies are
//! appended to the sink in fetch order.

use mesh_auth::{CallKind, Credentials, HeaderBuilder};
use mesh_protocol::Endpoints;
use mesh_protocol::constants::{ENCODING_GZIP, headers as h, status};
use mesh_transfer::{DownloadState, decompress, validate_message_id};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::transport::{Request, Response, Transport};

/// Result of a finished download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Status of the last response: `200` or `206`.
    pub final_status: u16,
    /// Successful reads.
    pub chunk_count: u32,
    /// Payload bytes written to the sink.
    pub bytes: u64,
}

/// Drives one chunked download at a time over a shared transport.
pub struct ChunkedDownloader<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
    headers: &'a HeaderBuilder,
}

impl<'a> ChunkedDownloader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoints: &'a Endpoints,
        headers: &'a HeaderBuilder,
    ) -> Self {
        Self {
            transport,
            endpoints,
            headers,
        }
    }

    /// Downloads `message_id` into `sink`.
    ///
    /// The message is not acknowledged. On failure the sink holds whatever
    /// was appended before the failing chunk.
    pub async fn download<W>(
        &self,
        credentials: &Credentials,
        message_id: &str,
        sink: &mut W,
    ) -> Result<DownloadOutcome, ClientError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        validate_message_id(message_id)?;

        let mut state = DownloadState::new(message_id);
        let mut final_status = status::OK;

        while let Some(index) = state.next_index() {
            match self.fetch_chunk(credentials, &mut state, index, sink).await {
                Ok(code) => final_status = code,
                Err(e) => {
                    let total = state.total_chunks().unwrap_or(0);
                    return Err(e.after_chunks(state.fetched(), total));
                }
            }
        }
        sink.flush().await?;

        info!(
            message_id,
            chunks = state.fetched(),
            bytes = state.bytes(),
            "download complete"
        );
        Ok(DownloadOutcome {
            final_status,
            chunk_count: state.fetched(),
            bytes: state.bytes(),
        })
    }

    /// Fetches one chunk, appends it, and advances `state`.
    async fn fetch_chunk<W>(
        &self,
        credentials: &Credentials,
        state: &mut DownloadState,
        index: u32,
        sink: &mut W,
    ) -> Result<u16, ClientError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mailbox = credentials.mailbox_id();
        let url = if index == 1 {
            self.endpoints.inbox_message(mailbox, state.message_id())
        } else {
            self.endpoints.inbox_chunk(mailbox, state.message_id(), index)
        };

        let headers = self.headers.build(credentials, CallKind::Inbound)?;
        let response = self.transport.send(Request::get(url, headers)).await?;

        match response.status {
            status::OK => {
                let body = decode_body(response).await?;
                sink.write_all(&body).await?;
                state.record_complete(body.len() as u64)?;
                debug!(chunk = index, bytes = body.len(), "message complete");
                Ok(status::OK)
            }
            status::PARTIAL_CONTENT => {
                let range = state.check_partial(response.header(h::CHUNK_RANGE))?;
                let body = decode_body(response).await?;
                sink.write_all(&body).await?;
                state.record_partial(range, body.len() as u64);
                debug!(
                    chunk = range.index,
                    total = range.total,
                    bytes = body.len(),
                    "chunk received"
                );
                Ok(status::PARTIAL_CONTENT)
            }
            _ => Err(response.into_status_error()),
        }
    }
}

/// Returns the payload bytes, undoing `content-encoding: gzip`.
pub(crate) async fn decode_body(response: Response) -> Result<Vec<u8>, ClientError> {
    let gzipped = response
        .header(h::CONTENT_ENCODING)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case(ENCODING_GZIP));
    if !gzipped {
        return Ok(response.body);
    }

    let body = response.body;
    let decoded = tokio::task::spawn_blocking(move || decompress(&body))
        .await
        .map_err(std::io::Error::other)??;
    Ok(decoded)
}
