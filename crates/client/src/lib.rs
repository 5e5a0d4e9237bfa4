//! HTTP client for the chunkvault storage API.
//!
//! Thin request/response layer over `reqwest`: file registration, file
//! lookup, raw chunk upload and download, directory creation.

pub mod client;
pub mod config;

pub use client::{Client, Error};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
