//! Batch request and response types.

use std::fmt;
use std::io;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::{self, BoxStream};

use crate::mime::detect_content_type;

/// Stream of content chunks supplied for a write.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// A single object to write.
pub struct WriteRequest {
    /// Object key, used as-is.
    pub path: String,
    /// Object content.
    pub content: ByteStream,
    /// Content type of the object, empty if unknown.
    pub content_type: String,
}

impl WriteRequest {
    /// Creates a new write request from a content stream.
    pub fn new(path: impl Into<String>, content: ByteStream) -> Self {
        Self {
            path: path.into(),
            content,
            content_type: String::new(),
        }
    }

    /// Creates a new write request from buffered content.
    pub fn from_bytes(path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self::new(path, stream::once(async move { Ok::<_, io::Error>(content) }).boxed())
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the explicit content type, or the one detected from the path.
    pub fn effective_content_type(&self) -> &str {
        if self.content_type.is_empty() {
            detect_content_type(&self.path)
        } else {
            &self.content_type
        }
    }
}

impl fmt::Debug for WriteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteRequest")
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Metadata of a written or read object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Object key.
    pub name: String,
    /// Content type reported by the store.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// A file that failed to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    /// Object key of the failed request.
    pub file_path: String,
    /// Human readable cause.
    pub error: String,
}

/// Outcome of a batch write.
///
/// Every requested path appears exactly once, either in `files_written` or in
/// `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResponse {
    /// Successfully written files, in request order.
    pub files_written: Vec<FileMetadata>,
    /// Failed files, in request order.
    pub errors: Vec<WriteError>,
}

impl WriteResponse {
    /// Creates an empty response with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files_written: Vec::with_capacity(capacity),
            errors: Vec::new(),
        }
    }

    /// Returns the total number of processed items.
    pub fn len(&self) -> usize {
        self.files_written.len() + self.errors.len()
    }

    /// Returns `true` if no items were processed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fully loaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    /// Object metadata.
    pub metadata: FileMetadata,
    /// Entire object content.
    pub content: Bytes,
}

/// A file that failed to be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    /// Requested object key.
    pub file_path: String,
    /// Human readable cause.
    pub error: String,
}

/// Outcome of a batch read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadResponse {
    /// Successfully read files, in request order.
    pub files: Vec<FileData>,
    /// Failed files, in request order.
    pub errors: Vec<ReadError>,
}

impl ReadResponse {
    /// Creates an empty response with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::with_capacity(capacity),
            errors: Vec::new(),
        }
    }

    /// Returns the total number of processed items.
    pub fn len(&self) -> usize {
        self.files.len() + self.errors.len()
    }

    /// Returns `true` if no items were processed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_content_type_is_kept() {
        let request = WriteRequest::from_bytes("clip.mp4", "data").with_content_type("text/plain");
        assert_eq!(request.effective_content_type(), "text/plain");
    }

    #[test]
    fn empty_content_type_is_detected() {
        let request = WriteRequest::from_bytes("a/b/photo.heim", "data");
        assert_eq!(request.effective_content_type(), "image/heic");
    }

    #[test]
    fn debug_skips_content() {
        let request = WriteRequest::from_bytes("clip.mp4", "data");
        let debug = format!("{request:?}");
        assert!(debug.contains("clip.mp4"));
    }
}
