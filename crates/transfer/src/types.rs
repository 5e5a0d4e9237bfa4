//! Data types for the transfer flow.

use std::path::PathBuf;

/// Progress event emitted during a transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferEvent {
    /// File metadata registered on the service.
    Registered { file_id: i64, name: String },
    /// Source file split into local chunk files.
    Split { file_id: i64, chunks: usize },
    /// One chunk uploaded.
    ChunkSent {
        file_id: i64,
        ordinal: u64,
        total: usize,
        bytes: usize,
    },
    /// Chunk list fetched for a download.
    Located { file_name: String, chunks: usize },
    /// One chunk downloaded into the staging directory.
    ChunkReceived {
        file_name: String,
        index: usize,
        total: usize,
        bytes: usize,
    },
    /// Downloaded chunks merged into the final file.
    Merged { path: PathBuf, size: u64 },
    /// The transfer stopped at a failing step.
    Failed { error: String },
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    /// Path of the merged file.
    pub path: PathBuf,
    /// Staging directory that still holds the downloaded chunks.
    pub staging_dir: PathBuf,
    pub size: u64,
    /// Number of chunks fetched.
    pub chunks: usize,
    /// SHA-256 hex digest of the merged file.
    pub sha256: String,
}
