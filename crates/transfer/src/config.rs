//! Transfer settings.

use std::path::PathBuf;

use chunkvault_chunks::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// Settings shared by uploads and downloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferConfig {
    /// Maximum chunk size in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Local directory that holds chunk directories, staging directories
    /// and downloaded files.
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            work_dir: default_work_dir(),
        }
    }
}

impl TransferConfig {
    /// Creates a config with the default chunk size rooted at `work_dir`.
    pub fn in_dir(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), TransferError> {
        if self.chunk_size == 0 {
            return Err(TransferError::InvalidConfig(
                "chunk size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
