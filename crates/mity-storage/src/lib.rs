#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod mime;
mod storage;
mod types;

#[doc(hidden)]
pub mod prelude;

pub use client::{ObjectAttributes, ObjectStoreClient};
pub use config::{DEFAULT_OPERATION_TIMEOUT_SECS, GcsConfig};
pub use error::{StorageError, StorageResult};
pub use mime::{DEFAULT_CONTENT_TYPE, detect_content_type, extension};
pub use storage::{ObjectStorage, Storage};
pub use types::{
    ByteStream, FileData, FileMetadata, ReadError, ReadResponse, WriteError, WriteRequest,
    WriteResponse,
};

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "mity_storage";
