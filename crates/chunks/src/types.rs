use std::path::PathBuf;

/// A block of a source file, as produced by [`ChunkReader`](crate::ChunkReader).
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 1-based position within the file.
    pub ordinal: u64,
    /// Byte offset within the file.
    pub offset: u64,
    /// Raw chunk data.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Size of this chunk in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A chunk file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub ordinal: u64,
    pub path: PathBuf,
}

impl ChunkFile {
    /// The file name component, e.g. `report.pdf_2.bin`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
