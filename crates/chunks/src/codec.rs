//! Split and merge over numbered chunk files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chunked::ChunkReader;
use crate::types::ChunkFile;
use crate::{CHUNK_EXTENSION, ChunkError};

/// Returns the chunk file name for `base` at `ordinal`, e.g. `report.pdf_1.bin`.
pub fn chunk_file_name(base: &str, ordinal: u64) -> String {
    format!("{base}_{ordinal}.{CHUNK_EXTENSION}")
}

/// Parses the ordinal out of a chunk file name produced for `base`.
///
/// Returns `None` if `file_name` does not follow the `<base>_<n>.bin`
/// scheme or if `n` is zero.
pub fn parse_chunk_ordinal(base: &str, file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(base)?
        .strip_prefix('_')?
        .strip_suffix(CHUNK_EXTENSION)?
        .strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&n| n >= 1)
}

/// Returns the final path component of `path` as UTF-8.
pub fn base_name(path: &Path) -> Result<&str, ChunkError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ChunkError::InvalidName(path.display().to_string()))
}

/// Splits `source` into chunk files of at most `chunk_size` bytes inside
/// `output_dir`, creating the directory if needed.
///
/// Chunks are named after the source's base name. An empty source yields
/// no chunk files. Returns `output_dir` on success; on error the directory
/// may hold a partial set of chunks and must not be used.
pub fn split_file(
    source: &Path,
    chunk_size: usize,
    output_dir: &Path,
) -> Result<PathBuf, ChunkError> {
    let base = base_name(source)?;
    let mut reader = ChunkReader::new(source, chunk_size)?;
    std::fs::create_dir_all(output_dir)?;

    let mut count = 0u64;
    while let Some(chunk) = reader.next_chunk()? {
        let chunk_path = output_dir.join(chunk_file_name(base, chunk.ordinal));
        let mut out = File::create(&chunk_path)?;
        out.write_all(&chunk.data)?;
        out.flush()?;
        count += 1;
    }

    debug!(
        source = %source.display(),
        output = %output_dir.display(),
        chunks = count,
        bytes = reader.offset(),
        "split complete"
    );

    Ok(output_dir.to_path_buf())
}

/// Rebuilds `output_file` from the chunk files in `chunks_dir`.
///
/// Chunk names are derived from the output file's own base name. Chunks are
/// appended from ordinal 1 upward until the first ordinal with no file; any
/// later chunks are ignored. Returns `output_file` on success.
pub fn merge_chunks(chunks_dir: &Path, output_file: &Path) -> Result<PathBuf, ChunkError> {
    let base = base_name(output_file)?;
    let mut out = BufWriter::new(File::create(output_file)?);

    let mut ordinal = 1u64;
    let mut bytes = 0u64;
    loop {
        let chunk_path = chunks_dir.join(chunk_file_name(base, ordinal));
        if !chunk_path.try_exists()? {
            break;
        }
        let mut chunk = File::open(&chunk_path)?;
        bytes += std::io::copy(&mut chunk, &mut out)?;
        ordinal += 1;
    }
    out.flush()?;

    debug!(
        output = %output_file.display(),
        chunks = ordinal - 1,
        bytes,
        "merge complete"
    );

    Ok(output_file.to_path_buf())
}

/// Lists the chunk files for `base` in `chunks_dir`, sorted by ordinal.
///
/// Entries that don't follow the naming scheme are skipped.
pub fn list_chunks(chunks_dir: &Path, base: &str) -> Result<Vec<ChunkFile>, ChunkError> {
    let mut chunks = Vec::new();
    for entry in std::fs::read_dir(chunks_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(ordinal) = name.to_str().and_then(|n| parse_chunk_ordinal(base, n)) else {
            continue;
        };
        chunks.push(ChunkFile {
            ordinal,
            path: entry.path(),
        });
    }
    chunks.sort_by_key(|c| c.ordinal);
    Ok(chunks)
}
