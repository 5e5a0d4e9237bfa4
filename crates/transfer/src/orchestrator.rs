//! Upload and download sequencing.
//!
//! Each transfer runs its steps strictly in order and stops at the first
//! failing one. Nothing is retried and nothing is cleaned up: chunk
//! directories, staging directories and registered metadata stay where the
//! failure left them.

use std::path::{Path, PathBuf};

use chunkvault_chunks::{
    ChunkError, ChunkFile, calculate_file_checksum, checksum_bytes, list_chunks, merge_chunks,
    split_file, validate_chunk_name,
};
use chunkvault_protocol::{FileRecord, RegisterFileRequest};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::config::TransferConfig;
use crate::error::TransferError;
use crate::service::StorageService;
use crate::source::inspect_source;
use crate::types::{DownloadResult, TransferEvent};

/// Returns the local staging directory name used when downloading
/// `file_name`: the text before the first `.`.
///
/// Names without a usable prefix (no dot, or a leading dot) get a `_chunks`
/// suffix so the directory never takes the merged file's own path.
pub fn staging_dir_name(file_name: &str) -> String {
    match file_name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => format!("{file_name}_chunks"),
    }
}

/// Runs uploads and downloads against a storage service.
pub struct TransferOrchestrator<'a> {
    service: &'a dyn StorageService,
    config: TransferConfig,
    events_tx: Option<mpsc::Sender<TransferEvent>>,
}

impl<'a> TransferOrchestrator<'a> {
    /// Creates an orchestrator that talks to `service`.
    pub fn new(service: &'a dyn StorageService, config: TransferConfig) -> Self {
        Self {
            service,
            config,
            events_tx: None,
        }
    }

    /// Sends progress events to `events_tx`.
    ///
    /// Events are dropped when the channel is full or closed.
    pub fn with_events(mut self, events_tx: mpsc::Sender<TransferEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Uploads the file at `local_path` into `directory_path` on the service.
    ///
    /// The pipeline:
    /// 1. Inspect the file (size, guessed MIME type)
    /// 2. Register its metadata; a reply without a file id ends the upload
    /// 3. Split it into `<work_dir>/<file_id>/<name>_<n>.bin`
    /// 4. Upload every chunk in ordinal order
    ///
    /// Returns the registered record once every chunk is stored.
    pub async fn upload(
        &self,
        local_path: &Path,
        directory_path: Option<&str>,
    ) -> Result<FileRecord, TransferError> {
        match self.run_upload(local_path, directory_path).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!(path = %local_path.display(), error = %e, "upload failed");
                self.emit(TransferEvent::Failed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Downloads the file named `file_name` into `<work_dir>/<file_name>`.
    ///
    /// Chunks are fetched in the order the service lists them into a
    /// staging directory named by [`staging_dir_name`], then merged.
    pub async fn download(&self, file_name: &str) -> Result<DownloadResult, TransferError> {
        match self.run_download(file_name).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(file_name, error = %e, "download failed");
                self.emit(TransferEvent::Failed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    async fn run_upload(
        &self,
        local_path: &Path,
        directory_path: Option<&str>,
    ) -> Result<FileRecord, TransferError> {
        self.config.validate()?;

        // 1. Inspect
        let source = blocking({
            let path = local_path.to_path_buf();
            move || inspect_source(&path)
        })
        .await??;

        // 2. Register
        let request = RegisterFileRequest {
            name: source.name.clone(),
            mime_type: source.mime_type.clone(),
            size: source.size,
            path: directory_path.map(str::to_string),
        };
        let response = self
            .service
            .register_file(&request)
            .await
            .map_err(|e| TransferError::Registration(e.to_string()))?;

        let service_error = response.error.clone();
        let Some(record) = response.into_record(&request) else {
            return Err(TransferError::Registration(
                service_error.unwrap_or_else(|| "service returned no file id".into()),
            ));
        };
        let file_id = record.file_id;

        info!(file_id, name = %record.name, size = record.size, "file registered");
        self.emit(TransferEvent::Registered {
            file_id,
            name: record.name.clone(),
        })
        .await;

        // 3. Split
        let chunk_dir = self.config.work_dir.join(file_id.to_string());
        let chunks = blocking({
            let source_path = source.path.clone();
            let name = source.name.clone();
            let chunk_size = self.config.chunk_size;
            move || -> Result<Vec<ChunkFile>, ChunkError> {
                let dir = split_file(&source_path, chunk_size, &chunk_dir)?;
                list_chunks(&dir, &name)
            }
        })
        .await?
        .map_err(TransferError::Split)?;

        let total = chunks.len();
        debug!(file_id, chunks = total, "file split");
        self.emit(TransferEvent::Split {
            file_id,
            chunks: total,
        })
        .await;

        // 4. Upload chunks
        for chunk in &chunks {
            let chunk_name = chunk.file_name();
            let upload_err = |reason: String| TransferError::ChunkUpload {
                chunk: chunk_name.clone(),
                reason,
            };

            let data = tokio::fs::read(&chunk.path)
                .await
                .map_err(|e| upload_err(e.to_string()))?;
            let bytes = data.len();
            let sha256 = checksum_bytes(&data);

            self.service
                .upload_chunk(file_id, &chunk_name, data)
                .await
                .map_err(|e| upload_err(e.to_string()))?;

            debug!(file_id, chunk = %chunk_name, bytes, %sha256, "chunk uploaded");
            self.emit(TransferEvent::ChunkSent {
                file_id,
                ordinal: chunk.ordinal,
                total,
                bytes,
            })
            .await;
        }

        info!(file_id, chunks = total, "upload complete");
        Ok(record)
    }

    async fn run_download(&self, file_name: &str) -> Result<DownloadResult, TransferError> {
        let lookup_err = |reason: String| TransferError::Lookup {
            file_name: file_name.to_string(),
            reason,
        };

        validate_chunk_name(file_name).map_err(|e| lookup_err(e.to_string()))?;

        // 1. Locate
        let descriptor = self
            .service
            .get_file(file_name)
            .await
            .map_err(|e| lookup_err(e.to_string()))?;
        if let Some(message) = descriptor.error {
            return Err(lookup_err(message));
        }
        let Some(file_id) = descriptor.file_id else {
            return Err(lookup_err("service returned no file id".into()));
        };

        let total = descriptor.chunks.len();
        info!(file_id, file_name, chunks = total, "file located");
        self.emit(TransferEvent::Located {
            file_name: file_name.to_string(),
            chunks: total,
        })
        .await;

        // 2. Stage
        let staging_dir = self.config.work_dir.join(staging_dir_name(file_name));
        tokio::fs::create_dir_all(&staging_dir).await?;

        // 3. Fetch chunks in service order
        for (index, chunk) in descriptor.chunks.iter().enumerate() {
            let download_err = |reason: String| TransferError::ChunkDownload {
                chunk: chunk.chunk_name.clone(),
                reason,
            };

            validate_chunk_name(&chunk.chunk_name).map_err(|e| download_err(e.to_string()))?;

            let data = self
                .service
                .download_chunk(chunk.chunk_id)
                .await
                .map_err(|e| download_err(e.to_string()))?;
            let bytes = data.len();

            tokio::fs::write(staging_dir.join(&chunk.chunk_name), data)
                .await
                .map_err(|e| download_err(e.to_string()))?;

            debug!(file_id, chunk = %chunk.chunk_name, bytes, "chunk downloaded");
            self.emit(TransferEvent::ChunkReceived {
                file_name: file_name.to_string(),
                index: index + 1,
                total,
                bytes,
            })
            .await;
        }

        // 4. Merge
        let output = self.config.work_dir.join(file_name);
        let (path, size, sha256) = blocking({
            let staging_dir = staging_dir.clone();
            move || -> Result<(PathBuf, u64, String), ChunkError> {
                let path = merge_chunks(&staging_dir, &output)?;
                let size = std::fs::metadata(&path)?.len();
                let sha256 = calculate_file_checksum(&path)?;
                Ok((path, size, sha256))
            }
        })
        .await?
        .map_err(TransferError::Merge)?;

        info!(file_id, path = %path.display(), size, "download complete");
        self.emit(TransferEvent::Merged {
            path: path.clone(),
            size,
        })
        .await;

        Ok(DownloadResult {
            path,
            staging_dir,
            size,
            chunks: total,
            sha256,
        })
    }

    async fn emit(&self, event: TransferEvent) {
        if let Some(tx) = &self.events_tx {
            let _ = tx.try_send(event);
        }
    }
}

/// Runs blocking file-system work off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, TransferError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TransferError::Task(format!("task join error: {e}")))
}
