use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::Chunk;
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Gzip-compresses one chunk.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, TransferError> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompresses a gzip body. Concatenated members are decoded in order.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, TransferError> {
    let mut out = Vec::with_capacity(data.len() * 2);
    MultiGzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// Number of chunks needed for `size` bytes: `ceil(size / chunk_size)`.
///
/// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] is used.
pub fn total_chunks(size: u64, chunk_size: usize) -> Result<u32, TransferError> {
    let chunk_size = effective_chunk_size(chunk_size) as u64;
    let count = size.div_ceil(chunk_size);
    u32::try_from(count).map_err(|_| TransferError::TooManyChunks { size })
}

fn effective_chunk_size(chunk_size: usize) -> usize {
    if chunk_size == 0 {
        DEFAULT_CHUNK_SIZE
    } else {
        chunk_size
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// An outbound payload: a byte source with a size known up front.
///
/// The size must be known before streaming so the chunk total can be sent
/// with chunk 1.
pub struct Payload {
    reader: Box<dyn AsyncRead + Send + Unpin>,
    size: u64,
}

impl Payload {
    /// Wraps an in-memory buffer.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self {
            reader: Box::new(std::io::Cursor::new(data)),
            size,
        }
    }

    /// Opens a file; its size is taken from metadata and the content is
    /// streamed chunk by chunk.
    pub async fn from_file(path: &Path) -> Result<Self, TransferError> {
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        Ok(Self {
            reader: Box::new(file),
            size,
        })
    }

    /// Wraps any reader that will yield exactly `size` bytes.
    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static, size: u64) -> Self {
        Self {
            reader: Box::new(reader),
            size,
        }
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Splits the payload into chunks of `chunk_size` bytes.
    pub fn into_chunks(
        self,
        chunk_size: usize,
    ) -> Result<ChunkReader<Box<dyn AsyncRead + Send + Unpin>>, TransferError> {
        ChunkReader::new(self.reader, self.size, chunk_size)
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").field("size", &self.size).finish()
    }
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Lazily reads a payload in fixed-size chunks.
///
/// Only one chunk is held in memory at a time. The last chunk may be short.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    total_size: u64,
    offset: u64,
    next_index: u32,
    total_chunks: u32,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Creates a reader over `total_size` bytes of `reader`.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] is used.
    pub fn new(reader: R, total_size: u64, chunk_size: usize) -> Result<Self, TransferError> {
        let chunk_size = effective_chunk_size(chunk_size);
        let total_chunks = total_chunks(total_size, chunk_size)?;
        Ok(Self {
            reader,
            chunk_size,
            total_size,
            offset: 0,
            next_index: 1,
            total_chunks,
        })
    }

    /// Reads the next chunk. Returns `None` once `total_size` bytes were read.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        let remaining = self.total_size - self.offset;
        if remaining == 0 {
            return Ok(None);
        }

        let read_size = remaining.min(self.chunk_size as u64) as usize;
        let mut buf = vec![0u8; read_size];
        let mut filled = 0;
        while filled < read_size {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(TransferError::ShortPayload {
                    offset: self.offset + filled as u64,
                    expected: self.total_size,
                });
            }
            filled += n;
        }

        let chunk = Chunk {
            index: self.next_index,
            total: self.total_chunks,
            data: buf,
        };
        self.offset += read_size as u64;
        self.next_index += 1;
        Ok(Some(chunk))
    }

    /// Chunk count, fixed before the first read.
    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes read so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    async fn collect<R: AsyncRead + Unpin>(mut reader: ChunkReader<R>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk().await.unwrap() {
            chunks.push(chunk);
        }
        chunks
    }

    #[test]
    fn decompress_reads_every_member() {
        let mut body = compress(b"first ").unwrap();
        body.extend(compress(b"second").unwrap());
        assert_eq!(decompress(&body).unwrap(), b"first second");
    }

    #[test]
    fn total_chunks_rounds_up() {
        assert_eq!(total_chunks(0, 4).unwrap(), 0);
        assert_eq!(total_chunks(1, 4).unwrap(), 1);
        assert_eq!(total_chunks(4, 4).unwrap(), 1);
        assert_eq!(total_chunks(5, 4).unwrap(), 2);
        assert_eq!(total_chunks(25 * 1024 * 1024, 10 * 1024 * 1024).unwrap(), 3);
    }

    #[test]
    fn total_chunks_default_size() {
        assert_eq!(total_chunks(DEFAULT_CHUNK_SIZE as u64 + 1, 0).unwrap(), 2);
    }

    #[test]
    fn total_chunks_overflow() {
        assert!(matches!(
            total_chunks(u64::MAX, 1),
            Err(TransferError::TooManyChunks { .. })
        ));
    }

    #[tokio::test]
    async fn reader_splits_and_reassembles() {
        let data = b"AABBCCDDEE".to_vec();
        let reader = Payload::from_bytes(data.clone()).into_chunks(4).unwrap();
        assert_eq!(reader.total_chunks(), 3);

        let chunks = collect(reader).await;
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].data, b"AABB");
        assert_eq!(chunks[1].data, b"CCDD");
        assert_eq!(chunks[2].data, b"EE");

        let indices: Vec<u32> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(chunks.iter().all(|c| c.total == 3));

        let joined: Vec<u8> = chunks.into_iter().flat_map(|c| c.data).collect();
        assert_eq!(joined, data);
    }

    #[tokio::test]
    async fn reader_exact_multiple() {
        let data = vec![7u8; 12];
        let chunks = collect(Payload::from_bytes(data).into_chunks(4).unwrap()).await;
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.data.len() == 4));
    }

    #[tokio::test]
    async fn reader_empty_payload_yields_nothing() {
        let reader = Payload::from_bytes(Vec::new()).into_chunks(4).unwrap();
        assert_eq!(reader.total_chunks(), 0);
        assert!(collect(reader).await.is_empty());
    }

    #[tokio::test]
    async fn reader_short_source_is_an_error() {
        let mut reader =
            ChunkReader::new(std::io::Cursor::new(b"abc".to_vec()), 6, 4).unwrap();
        let err = reader.next_chunk().await.unwrap_err();
        assert!(matches!(
            err,
            TransferError::ShortPayload {
                offset: 3,
                expected: 6
            }
        ));
    }

    #[tokio::test]
    async fn payload_from_file_streams() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.csv");
        let data: Vec<u8> = (0..10_000u32).flat_map(|i| i.to_le_bytes()).collect();
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&data)
            .unwrap();

        let payload = Payload::from_file(&path).await.unwrap();
        assert_eq!(payload.size(), data.len() as u64);

        let reader = payload.into_chunks(3000).unwrap();
        assert_eq!(reader.total_chunks(), 14);
        let joined: Vec<u8> = collect(reader).await.into_iter().flat_map(|c| c.data).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn compress_then_decompress() {
        let data = b"The quick brown fox jumps over the lazy dog".repeat(100);
        let packed = compress(&data).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(&packed[..2], &[0x1f, 0x8b]); // gzip magic
        assert_eq!(decompress(&packed).unwrap(), data);
    }

    #[test]
    fn decompress_rejects_plain_bytes() {
        assert!(decompress(b"not gzip at all").is_err());
    }
}
