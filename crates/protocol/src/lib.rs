//! Wire types for the chunkvault storage API.
//!
//! Field names follow the service's camelCase JSON and form encoding.

pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use messages::{
    DownloadChunkQuery, FileDescriptor, GetFileQuery, MakeDirectoryQuery, RegisterFileRequest,
    RegisterFileResponse,
};
pub use types::{ChunkDescriptor, FileRecord};
