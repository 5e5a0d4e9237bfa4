use std::path::{Component, Path};

use crate::ChunkError;

/// Validates that a name received from the service is a single plain file
/// name, safe to join onto a local staging directory.
///
/// Rejects:
/// - Empty names
/// - Absolute paths and Windows prefixes (`C:`, `\\server`)
/// - Parent (`..`) and current (`.`) directory components
/// - Anything with more than one path component
pub fn validate_chunk_name(name: &str) -> Result<(), ChunkError> {
    if name.is_empty() {
        return Err(ChunkError::InvalidName("empty name".into()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (Some(Component::ParentDir), _) | (Some(Component::Normal(_)), Some(Component::ParentDir)) => {
            Err(ChunkError::InvalidName(format!(
                "parent directory traversal not allowed: {name}"
            )))
        }
        (Some(Component::RootDir | Component::Prefix(_)), _) => Err(ChunkError::InvalidName(
            format!("absolute path not allowed: {name}"),
        )),
        _ => Err(ChunkError::InvalidName(format!(
            "expected a single file name: {name}"
        ))),
    }
}
