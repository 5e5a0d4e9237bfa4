//! Transfer error types.

use chunkvault_chunks::ChunkError;

/// Errors produced by an upload or download.
///
/// Each failing step of a transfer maps to its own variant; the transfer
/// stops at the first one.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage client error: {0}")]
    Client(#[from] chunkvault_client::Error),

    #[error("service error: {0}")]
    Service(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid source file: {0}")]
    InvalidSource(String),

    #[error("file registration failed: {0}")]
    Registration(String),

    #[error("split failed: {0}")]
    Split(#[source] ChunkError),

    #[error("chunk upload failed for {chunk}: {reason}")]
    ChunkUpload { chunk: String, reason: String },

    #[error("file lookup failed for {file_name}: {reason}")]
    Lookup { file_name: String, reason: String },

    #[error("chunk download failed for {chunk}: {reason}")]
    ChunkDownload { chunk: String, reason: String },

    #[error("merge failed: {0}")]
    Merge(#[source] ChunkError),

    #[error("background task failed: {0}")]
    Task(String),
}
