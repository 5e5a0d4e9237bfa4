use serde::{Deserialize, Serialize};

use crate::types::{ChunkDescriptor, FileRecord};

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Registers a file's metadata. Sent form-encoded to `POST /file`.
///
/// Absent optionals are left out of the form entirely, so services without
/// directory support never see a `path` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFileRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Query for `GET /file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFileQuery {
    pub file_name: String,
}

/// Query for `GET /download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadChunkQuery {
    pub chunk_id: i64,
}

/// Query for `POST /directory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeDirectoryQuery {
    pub dir_path: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Response to a file registration.
///
/// A missing `fileId` means the registration failed; `error` then carries
/// the service's explanation, when it gives one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFileResponse {
    #[serde(default)]
    pub file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegisterFileResponse {
    /// Combines the server-assigned id with the request that produced it.
    ///
    /// Returns `None` when the service did not assign an id.
    pub fn into_record(self, request: &RegisterFileRequest) -> Option<FileRecord> {
        let file_id = self.file_id?;
        Some(FileRecord {
            file_id,
            name: request.name.clone(),
            size: request.size,
            mime_type: request.mime_type.clone(),
            path: request.path.clone(),
        })
    }
}

/// Response to a file lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    #[serde(default)]
    pub file_id: Option<i64>,
    #[serde(default)]
    pub file_name: String,
    /// Chunks in the order they must be concatenated.
    #[serde(default, rename = "chunksIds")]
    pub chunks: Vec<ChunkDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_omits_missing_path_and_mime() {
        let req = RegisterFileRequest {
            name: "blob".into(),
            mime_type: None,
            size: 3,
            path: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"name":"blob","size":3}"#);
    }

    #[test]
    fn register_request_uses_wire_names() {
        let req = RegisterFileRequest {
            name: "report.pdf".into(),
            mime_type: Some("application/pdf".into()),
            size: 10,
            path: Some("~/docs".into()),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"mimeType\":\"application/pdf\""));
        assert!(json.contains("\"path\":\"~/docs\""));
    }

    #[test]
    fn register_response_with_id_builds_record() {
        let resp: RegisterFileResponse = serde_json::from_str(r#"{"fileId":42}"#).unwrap();
        let req = RegisterFileRequest {
            name: "a.txt".into(),
            mime_type: Some("text/plain".into()),
            size: 5,
            path: None,
        };
        let record = resp.into_record(&req).unwrap();
        assert_eq!(record.file_id, 42);
        assert_eq!(record.name, "a.txt");
        assert_eq!(record.size, 5);
        assert_eq!(record.mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn register_response_null_id_has_no_record() {
        let resp: RegisterFileResponse =
            serde_json::from_str(r#"{"fileId":null,"error":"directory not found"}"#).unwrap();
        assert_eq!(resp.error.as_deref(), Some("directory not found"));
        let req = RegisterFileRequest {
            name: "a.txt".into(),
            mime_type: None,
            size: 5,
            path: None,
        };
        assert!(resp.into_record(&req).is_none());
    }

    #[test]
    fn register_response_tolerates_extra_fields() {
        let resp: RegisterFileResponse =
            serde_json::from_str(r#"{"fileId":3,"name":"x","createdAt":"2024-01-01"}"#).unwrap();
        assert_eq!(resp.file_id, Some(3));
    }

    #[test]
    fn file_descriptor_reads_chunk_list_in_order() {
        let json = r#"{
            "fileId": 9,
            "fileName": "notes.txt",
            "chunksIds": [
                {"chunkId": 101, "chunkName": "notes.txt_1.bin"},
                {"chunkId": 102, "chunkName": "notes.txt_2.bin"}
            ]
        }"#;
        let desc: FileDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(desc.file_id, Some(9));
        assert_eq!(desc.chunks.len(), 2);
        assert_eq!(desc.chunks[0].chunk_id, 101);
        assert_eq!(desc.chunks[1].chunk_name, "notes.txt_2.bin");
    }

    #[test]
    fn file_descriptor_error_body() {
        let desc: FileDescriptor = serde_json::from_str(r#"{"error":"file not found"}"#).unwrap();
        assert!(desc.file_id.is_none());
        assert!(desc.chunks.is_empty());
        assert_eq!(desc.error.as_deref(), Some("file not found"));
    }
}
