//! Chunk codec: splits a file into numbered chunk files and merges them back.
//!
//! Chunk files are named `<base>_<ordinal>.bin`, ordinals starting at 1.
//! Everything here is local and blocking; callers in async code run it on
//! a blocking thread.

mod chunked;
mod codec;
mod types;
mod validation;

pub use chunked::{ChunkReader, calculate_file_checksum, checksum_bytes};
pub use codec::{
    base_name, chunk_file_name, list_chunks, merge_chunks, parse_chunk_ordinal, split_file,
};
pub use types::{Chunk, ChunkFile};
pub use validation::validate_chunk_name;

/// Default maximum chunk size: 20 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 20 * 1024 * 1024;

/// Extension of every chunk file.
pub const CHUNK_EXTENSION: &str = "bin";

/// Errors produced by the chunk codec.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("invalid name: {0}")]
    InvalidName(String),
}
