//! Chunked upload.
//!
//! Chunk 1 goes to the outbox creation endpoint and the `202` response names
//! the transfer. Chunks 2..N go to the continuation endpoint for that
//! transfer, strictly in order and one at a time. The first failure stops
//! the upload; nothing already sent is retried or cleaned up.

use mesh_auth::{CallKind, Credentials, HeaderBuilder, OutboundMeta};
use mesh_protocol::constants::status;
use mesh_protocol::{ChunkRange, Endpoints, SendMessageResponse};
use mesh_transfer::{Payload, TransferError, UploadState, UploadTarget, compress};
use tracing::{debug, info};

use crate::error::ClientError;
use crate::transport::{Request, Transport};

/// Addressing for an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Destination mailbox.
    pub to: String,
    pub workflow_id: String,
    pub file_name: String,
}

impl OutboundMessage {
    pub fn new(
        to: impl Into<String>,
        workflow_id: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            workflow_id: workflow_id.into(),
            file_name: file_name.into(),
        }
    }

    pub(crate) fn meta(&self, chunk_range: Option<ChunkRange>, compressed: bool) -> OutboundMeta {
        OutboundMeta {
            to: self.to.clone(),
            workflow_id: self.workflow_id.clone(),
            file_name: self.file_name.clone(),
            chunk_range,
            compressed,
        }
    }
}

/// Drives one chunked upload at a time over a shared transport.
pub struct ChunkedUploader<'a> {
    transport: &'a dyn Transport,
    endpoints: &'a Endpoints,
    headers: &'a HeaderBuilder,
    chunk_size: usize,
}

impl<'a> ChunkedUploader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        endpoints: &'a Endpoints,
        headers: &'a HeaderBuilder,
        chunk_size: usize,
    ) -> Self {
        Self {
            transport,
            endpoints,
            headers,
            chunk_size,
        }
    }

    /// Uploads `payload` and returns the server-assigned transfer id.
    ///
    /// Every chunk is gzip-compressed and carries `mex-chunk-range`. A failure
    /// after chunk 1 is reported as [`ClientError::PartialTransfer`].
    pub async fn upload(
        &self,
        credentials: &Credentials,
        message: &OutboundMessage,
        payload: Payload,
    ) -> Result<String, ClientError> {
        if payload.size() == 0 {
            return Err(TransferError::EmptyPayload.into());
        }

        let mut chunks = payload.into_chunks(self.chunk_size)?;
        let mut state = UploadState::new(chunks.total_chunks())?;
        let total = state.total_chunks();

        debug!(
            to = %message.to,
            bytes = chunks.total_size(),
            chunks = total,
            "starting chunked upload"
        );

        while !state.is_done() {
            let chunk = match chunks.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => {
                    let err = TransferError::ShortPayload {
                        offset: chunks.offset(),
                        expected: chunks.total_size(),
                    };
                    return Err(ClientError::from(err).after_chunks(state.completed(), total));
                }
                Err(e) => {
                    return Err(ClientError::from(e).after_chunks(state.completed(), total));
                }
            };

            if let Err(e) = self.send_chunk(credentials, message, &mut state, chunk.data).await {
                return Err(e.after_chunks(state.completed(), total));
            }
        }

        let transfer_id = state
            .transfer_id()
            .map(str::to_string)
            .ok_or_else(|| ClientError::Protocol("upload finished without a transfer id".into()))?;

        info!(transfer_id = %transfer_id, chunks = total, "upload complete");
        Ok(transfer_id)
    }

    /// Sends the chunk `state` points at and records the server's answer.
    async fn send_chunk(
        &self,
        credentials: &Credentials,
        message: &OutboundMessage,
        state: &mut UploadState,
        raw: Vec<u8>,
    ) -> Result<(), ClientError> {
        let range = state.next_range()?;
        let url = match state.target()? {
            UploadTarget::Create => self.endpoints.outbox(credentials.mailbox_id()),
            UploadTarget::Continue { transfer_id, index } => {
                self.endpoints.outbox_chunk(credentials.mailbox_id(), transfer_id, index)
            }
        };

        let raw_len = raw.len();
        let body = compress_blocking(raw).await?;

        let meta = message.meta(Some(range), true);
        let headers = self.headers.build(credentials, CallKind::Outbound(&meta))?;
        let response = self.transport.send(Request::post(url, headers, body)).await?;

        if response.status != status::ACCEPTED {
            return Err(response.into_status_error());
        }

        let transfer_id = if range.index == 1 {
            let resp: SendMessageResponse = serde_json::from_slice(&response.body)?;
            Some(resp.message_id)
        } else {
            None
        };
        state.record_accepted(transfer_id)?;

        debug!(
            chunk = range.index,
            total = range.total,
            bytes = raw_len,
            transfer_id = state.transfer_id().unwrap_or_default(),
            "chunk accepted"
        );
        Ok(())
    }
}

/// Compresses off the async worker threads.
pub(crate) async fn compress_blocking(raw: Vec<u8>) -> Result<Vec<u8>, ClientError> {
    let compressed = tokio::task::spawn_blocking(move || compress(&raw))
        .await
        .map_err(std::io::Error::other)??;
    Ok(compressed)
}
