use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::ChunkError;
use crate::types::Chunk;

// ---------------------------------------------------------------------------
// Checksum helpers
// ---------------------------------------------------------------------------

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes SHA-256 of an entire file and returns the hex-encoded digest.
pub fn calculate_file_checksum(path: &Path) -> Result<String, ChunkError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads a file sequentially in blocks of at most `chunk_size` bytes.
///
/// Every chunk except the last is exactly `chunk_size` bytes long.
pub struct ChunkReader {
    file: std::fs::File,
    chunk_size: usize,
    offset: u64,
    next_ordinal: u64,
    file_size: u64,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    pub fn new(path: &Path, chunk_size: usize) -> Result<Self, ChunkError> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidChunkSize);
        }
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            file,
            chunk_size,
            offset: 0,
            next_ordinal: 1,
            file_size,
        })
    }

    /// Reads the next chunk. Returns `None` at EOF.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, ChunkError> {
        let mut buf = Vec::with_capacity(self.chunk_size.min(self.remaining() as usize));
        let n = (&mut self.file)
            .take(self.chunk_size as u64)
            .read_to_end(&mut buf)?;
        if n == 0 {
            return Ok(None);
        }

        let chunk = Chunk {
            ordinal: self.next_ordinal,
            offset: self.offset,
            data: buf,
        };
        self.offset += n as u64;
        self.next_ordinal += 1;
        Ok(Some(chunk))
    }

    /// Current byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// File size in bytes at open time.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes remaining to read, based on the size at open time.
    pub fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.offset)
    }
}
