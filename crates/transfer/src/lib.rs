//! Chunked file upload and download against the chunkvault storage service.
//!
//! This crate holds the transfer **business logic**. It reaches the network
//! only through the [`StorageService`] trait, which the HTTP
//! [`chunkvault_client::Client`] implements.
//!
//! # Upload
//!
//! 1. **Inspect** — read size and guess the MIME type
//! 2. **Register** — create the file record, obtain its id
//! 3. **Split** — write `<name>_<n>.bin` chunk files under `<work_dir>/<id>`
//! 4. **Send** — upload each chunk in ordinal order
//!
//! # Download
//!
//! 1. **Locate** — fetch the file record and its ordered chunk list
//! 2. **Fetch** — write each chunk into a staging directory
//! 3. **Merge** — concatenate the staged chunks into the final file

pub mod config;
pub mod error;
pub mod mime;
pub mod orchestrator;
pub mod service;
pub mod source;
pub mod types;

// Re-export primary types for convenience.
pub use chunkvault_protocol::{ChunkDescriptor, FileRecord};
pub use config::TransferConfig;
pub use error::TransferError;
pub use mime::guess_mime_type;
pub use orchestrator::{TransferOrchestrator, staging_dir_name};
pub use service::{ServiceFuture, StorageService};
pub use source::{SourceFile, inspect_source};
pub use types::{DownloadResult, TransferEvent};
