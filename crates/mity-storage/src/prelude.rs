//! Prelude module for convenient imports.

pub use crate::client::{ObjectAttributes, ObjectStoreClient};
pub use crate::config::GcsConfig;
pub use crate::error::{StorageError, StorageResult};
pub use crate::mime::{DEFAULT_CONTENT_TYPE, detect_content_type};
pub use crate::storage::{ObjectStorage, Storage};
pub use crate::types::{
    ByteStream, FileData, FileMetadata, ReadError, ReadResponse, WriteError, WriteRequest,
    WriteResponse,
};
