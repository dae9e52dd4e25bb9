//! File response types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mity_storage::{FileData, FileMetadata, ReadError, ReadResponse, WriteError, WriteResponse};
use serde::{Deserialize, Serialize};

/// Metadata of a stored file.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Object key.
    pub name: String,
    /// Content type reported by the store.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl From<FileMetadata> for File {
    fn from(metadata: FileMetadata) -> Self {
        Self {
            name: metadata.name,
            content_type: metadata.content_type,
            size: metadata.size,
        }
    }
}

/// A file that could not be written or read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// Requested object key.
    pub file_path: String,
    /// Human readable cause.
    pub error: String,
}

impl From<WriteError> for FileError {
    fn from(error: WriteError) -> Self {
        Self {
            file_path: error.file_path,
            error: error.error,
        }
    }
}

impl From<ReadError> for FileError {
    fn from(error: ReadError) -> Self {
        Self {
            file_path: error.file_path,
            error: error.error,
        }
    }
}

/// Response for batch uploads.
///
/// Both lists are always present, even when empty.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrittenFiles {
    /// Successfully written files, in request order.
    pub files_written: Vec<File>,
    /// Failed files, in request order.
    pub errors: Vec<FileError>,
}

impl From<WriteResponse> for WrittenFiles {
    fn from(response: WriteResponse) -> Self {
        Self {
            files_written: response.files_written.into_iter().map(File::from).collect(),
            errors: response.errors.into_iter().map(FileError::from).collect(),
        }
    }
}

/// A downloaded file with its content encoded as standard base64.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    /// File metadata.
    pub metadata: File,
    /// Base64 encoded content.
    pub content: String,
}

impl From<FileData> for FileContent {
    fn from(data: FileData) -> Self {
        Self {
            metadata: data.metadata.into(),
            content: STANDARD.encode(&data.content),
        }
    }
}

/// Response for batch downloads.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContents {
    /// Successfully read files, in request order.
    pub files: Vec<FileContent>,
    /// Failed files, in request order.
    pub errors: Vec<FileError>,
}

impl From<ReadResponse> for FileContents {
    fn from(response: ReadResponse) -> Self {
        Self {
            files: response.files.into_iter().map(FileContent::from).collect(),
            errors: response.errors.into_iter().map(FileError::from).collect(),
        }
    }
}
