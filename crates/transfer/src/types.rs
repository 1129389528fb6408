use mesh_protocol::ChunkRange;

use crate::TransferError;

/// A raw chunk of payload data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position.
    pub index: u32,
    /// Chunk count of the whole payload.
    pub total: u32,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Where the next upload request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget<'a> {
    /// Chunk 1: the outbox creation endpoint.
    Create,
    /// Chunks 2..N: the continuation endpoint for `transfer_id`.
    Continue { transfer_id: &'a str, index: u32 },
}

/// State of one chunked upload.
///
/// The transfer id is assigned by the server in the response to chunk 1.
/// No request for a later chunk can be targeted before it is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadState {
    transfer_id: Option<String>,
    total_chunks: u32,
    next_index: u32,
}

impl UploadState {
    pub fn new(total_chunks: u32) -> Result<Self, TransferError> {
        if total_chunks == 0 {
            return Err(TransferError::EmptyPayload);
        }
        Ok(Self {
            transfer_id: None,
            total_chunks,
            next_index: 1,
        })
    }

    pub fn transfer_id(&self) -> Option<&str> {
        self.transfer_id.as_deref()
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Index of the chunk to send next.
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Chunks accepted by the server so far.
    pub fn completed(&self) -> u32 {
        self.next_index - 1
    }

    pub fn is_done(&self) -> bool {
        self.next_index > self.total_chunks
    }

    /// Range header value for the next chunk.
    pub fn next_range(&self) -> Result<ChunkRange, TransferError> {
        if self.is_done() {
            return Err(TransferError::Finished);
        }
        Ok(ChunkRange {
            index: self.next_index,
            total: self.total_chunks,
        })
    }

    /// Endpoint selection for the next chunk.
    pub fn target(&self) -> Result<UploadTarget<'_>, TransferError> {
        if self.is_done() {
            return Err(TransferError::Finished);
        }
        if self.next_index == 1 {
            return Ok(UploadTarget::Create);
        }
        match self.transfer_id.as_deref() {
            Some(transfer_id) => Ok(UploadTarget::Continue {
                transfer_id,
                index: self.next_index,
            }),
            None => Err(TransferError::MissingTransferId {
                index: self.next_index,
            }),
        }
    }

    /// Records a `202 Accepted` for the current chunk and advances.
    ///
    /// `transfer_id` is required for chunk 1 and ignored afterwards.
    pub fn record_accepted(&mut self, transfer_id: Option<String>) -> Result<(), TransferError> {
        if self.is_done() {
            return Err(TransferError::Finished);
        }
        if self.next_index == 1 {
            match transfer_id {
                Some(id) if !id.is_empty() => self.transfer_id = Some(id),
                _ => return Err(TransferError::MissingTransferId { index: 2 }),
            }
        }
        self.next_index += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// State of one chunked download.
///
/// Chunks are requested in strictly increasing order. The transfer ends when
/// a range header reports `index == total`, or on a `200` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadState {
    message_id: String,
    next_index: u32,
    total_chunks: Option<u32>,
    fetched: u32,
    bytes: u64,
    done: bool,
}

impl DownloadState {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            next_index: 1,
            total_chunks: None,
            fetched: 0,
            bytes: 0,
            done: false,
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Index to request next, or `None` once finished.
    pub fn next_index(&self) -> Option<u32> {
        (!self.done).then_some(self.next_index)
    }

    /// Known after the first partial response.
    pub fn total_chunks(&self) -> Option<u32> {
        self.total_chunks
    }

    /// Successful responses processed.
    pub fn fetched(&self) -> u32 {
        self.fetched
    }

    /// Payload bytes appended to the sink.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Records a `200` response: the message is complete.
    pub fn record_complete(&mut self, body_len: u64) -> Result<(), TransferError> {
        if self.done {
            return Err(TransferError::Finished);
        }
        self.fetched += 1;
        self.bytes += body_len;
        self.done = true;
        Ok(())
    }

    /// Validates the range header of a `206` response before its body is
    /// appended. Nothing is recorded on error.
    pub fn check_partial(&self, range_header: Option<&str>) -> Result<ChunkRange, TransferError> {
        if self.done {
            return Err(TransferError::Finished);
        }
        let requested = self.next_index;
        let raw = range_header.ok_or(TransferError::MissingChunkRange { index: requested })?;
        let range = raw.parse::<ChunkRange>().map_err(|e| {
            TransferError::InvalidChunkRange {
                value: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        if let Some(previous) = self.total_chunks
            && previous != range.total
        {
            return Err(TransferError::InconsistentTotal {
                previous,
                got: range.total,
            });
        }
        if range.index < requested {
            return Err(TransferError::RangeNotAdvancing {
                requested,
                got: raw.to_string(),
            });
        }
        // The first response may name any chunk; after that, none may be skipped.
        if requested > 1 && range.index != requested {
            return Err(TransferError::RangeSkipped {
                requested,
                got: raw.to_string(),
            });
        }
        Ok(range)
    }

    /// Records a validated `206` response and advances.
    pub fn record_partial(&mut self, range: ChunkRange, body_len: u64) {
        self.total_chunks = Some(range.total);
        self.fetched += 1;
        self.bytes += body_len;
        if range.is_last() {
            self.done = true;
        } else {
            self.next_index = range.index + 1;
        }
    }
}
