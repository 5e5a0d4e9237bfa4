//! Local source file inspection for upload.

use std::path::{Path, PathBuf};

use chunkvault_chunks::base_name;

use crate::error::TransferError;
use crate::mime::guess_mime_type;

/// A local file about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime_type: Option<String>,
}

/// Reads the name, size and guessed MIME type of the file at `path`.
pub fn inspect_source(path: &Path) -> Result<SourceFile, TransferError> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(TransferError::InvalidSource(format!(
            "not a regular file: {}",
            path.display()
        )));
    }
    let name = base_name(path)
        .map_err(|e| TransferError::InvalidSource(e.to_string()))?
        .to_string();

    Ok(SourceFile {
        path: path.to_path_buf(),
        name,
        size: metadata.len(),
        mime_type: guess_mime_type(path).map(str::to_string),
    })
}
