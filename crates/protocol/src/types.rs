use serde::{Deserialize, Serialize};

/// A registered file on the storage service.
///
/// Built from the registration request plus the server-assigned id; a record
/// without an id never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub file_id: i64,
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Containing directory on the service, if the service supports paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// One chunk of a stored file, as listed by the file lookup.
///
/// The position in the lookup's chunk list is the ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
    pub chunk_id: i64,
    pub chunk_name: String,
}
