//! Storage error types.

use std::io;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
///
/// Batch operations never return these for individual files; they are
/// rendered into the per-file error lists instead.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to initialize the storage backend.
    #[error("storage initialization failed: {0}")]
    Init(String),

    /// Object not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The content stream supplied by the caller failed.
    #[error("failed to read request content: {0}")]
    Content(#[source] io::Error),

    /// Write operation failed.
    #[error("write failed: {0}")]
    Write(String),

    /// Object attributes could not be fetched.
    #[error("failed to get object attributes: {0}")]
    Attributes(String),

    /// A written object could not be confirmed.
    ///
    /// The object may exist in the store even though the write is reported
    /// as failed.
    #[error("failed to get file attributes: {0}")]
    Confirmation(String),

    /// Read operation failed.
    #[error("read failed: {0}")]
    Read(String),

    /// Invalid object path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Backend-specific error.
    #[error("backend error: {0}")]
    Backend(opendal::Error),
}

impl StorageError {
    /// Creates a new initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Creates a new not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Creates a new write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    /// Creates a new attributes error.
    pub fn attributes(msg: impl Into<String>) -> Self {
        Self::Attributes(msg.into())
    }

    /// Creates a new write confirmation error.
    pub fn confirmation(msg: impl Into<String>) -> Self {
        Self::Confirmation(msg.into())
    }

    /// Creates a new read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Creates a new invalid path error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Returns `true` if the object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Backend(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opendal_not_found_is_classified() {
        let err = opendal::Error::new(opendal::ErrorKind::NotFound, "missing object");
        let err = StorageError::from(err);
        assert!(err.is_not_found());
    }

    #[test]
    fn opendal_permission_denied_is_classified() {
        let err = opendal::Error::new(opendal::ErrorKind::PermissionDenied, "no access");
        assert!(matches!(
            StorageError::from(err),
            StorageError::PermissionDenied(_)
        ));
    }

    #[test]
    fn content_error_keeps_source_message() {
        let err = StorageError::Content(io::Error::other("connection reset"));
        assert_eq!(
            err.to_string(),
            "failed to read request content: connection reset"
        );
    }
}
