use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of one chunk within a multi-part transfer.
///
/// Carried in the `mex-chunk-range` header as `"<index>:<total>"`.
/// Indices are 1-based and `index <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRange {
    pub index: u32,
    pub total: u32,
}

/// Error parsing a `mex-chunk-range` value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkRangeError {
    #[error("malformed chunk range: {0:?}")]
    Malformed(String),

    #[error("chunk index {index} outside 1..={total}")]
    OutOfBounds { index: u32, total: u32 },
}

impl ChunkRange {
    /// Creates a range, rejecting zero fields and `index > total`.
    pub fn new(index: u32, total: u32) -> Result<Self, ChunkRangeError> {
        if index == 0 || total == 0 || index > total {
            return Err(ChunkRangeError::OutOfBounds { index, total });
        }
        Ok(Self { index, total })
    }

    /// True when this is the final chunk.
    pub fn is_last(&self) -> bool {
        self.index == self.total
    }
}

impl fmt::Display for ChunkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.total)
    }
}

impl FromStr for ChunkRange {
    type Err = ChunkRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ChunkRangeError::Malformed(s.to_string());
        let (index, total) = s.trim().split_once(':').ok_or_else(malformed)?;
        let index = index.trim().parse::<u32>().map_err(|_| malformed())?;
        let total = total.trim().parse::<u32>().map_err(|_| malformed())?;
        Self::new(index, total)
    }
}

/// Body of a `202 Accepted` outbox response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message_id: String,
}

/// Body of an inbox listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxResponse {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub approx_inbox_count: u64,
}
