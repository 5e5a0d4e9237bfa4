//! Storage service trait and its HTTP implementation.
//!
//! `StorageService` is the seam between transfer logic and the network.
//! [`chunkvault_client::Client`] implements it for the real service; tests
//! use in-memory implementations.

use std::future::Future;
use std::pin::Pin;

use chunkvault_protocol::{FileDescriptor, RegisterFileRequest, RegisterFileResponse};

use crate::error::TransferError;

/// Boxed future returned by [`StorageService`] methods.
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransferError>> + Send + 'a>>;

/// Abstract connection to the storage service.
pub trait StorageService: Send + Sync {
    /// Registers file metadata and returns the service's reply.
    fn register_file<'a>(
        &'a self,
        request: &'a RegisterFileRequest,
    ) -> ServiceFuture<'a, RegisterFileResponse>;

    /// Looks up a file and its ordered chunk list by name.
    fn get_file<'a>(&'a self, file_name: &'a str) -> ServiceFuture<'a, FileDescriptor>;

    /// Stores one chunk's bytes under `file_id`.
    fn upload_chunk<'a>(
        &'a self,
        file_id: i64,
        chunk_name: &'a str,
        data: Vec<u8>,
    ) -> ServiceFuture<'a, ()>;

    /// Fetches one chunk's bytes.
    fn download_chunk(&self, chunk_id: i64) -> ServiceFuture<'_, Vec<u8>>;
}

impl StorageService for chunkvault_client::Client {
    fn register_file<'a>(
        &'a self,
        request: &'a RegisterFileRequest,
    ) -> ServiceFuture<'a, RegisterFileResponse> {
        Box::pin(async move {
            chunkvault_client::Client::register_file(self, request)
                .await
                .map_err(TransferError::from)
        })
    }

    fn get_file<'a>(&'a self, file_name: &'a str) -> ServiceFuture<'a, FileDescriptor> {
        Box::pin(async move {
            chunkvault_client::Client::get_file(self, file_name)
                .await
                .map_err(TransferError::from)
        })
    }

    fn upload_chunk<'a>(
        &'a self,
        file_id: i64,
        chunk_name: &'a str,
        data: Vec<u8>,
    ) -> ServiceFuture<'a, ()> {
        Box::pin(async move {
            chunkvault_client::Client::upload_chunk(self, file_id, chunk_name, data)
                .await
                .map_err(TransferError::from)
        })
    }

    fn download_chunk(&self, chunk_id: i64) -> ServiceFuture<'_, Vec<u8>> {
        Box::pin(async move {
            chunkvault_client::Client::download_chunk(self, chunk_id)
                .await
                .map_err(TransferError::from)
        })
    }
}
