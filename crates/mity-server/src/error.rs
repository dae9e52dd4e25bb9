//! Service layer error types.
//!
//! These errors cover building the application state: validating the
//! configuration and opening the object store session. Request handling uses
//! the HTTP error type in [`handler`](crate::handler) instead.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration-related errors.
    Config,
    /// External service communication errors.
    External,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::External => "external_service",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a new configuration error.
    #[inline]
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Creates a new external service error.
    #[inline]
    pub fn external(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::External, full_message)
    }

    /// Creates a new internal service error.
    #[inline]
    pub fn internal(
        service: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        let full_message = format!("{}: {}", service.into(), message.into());
        Self::new(ErrorKind::Internal, full_message)
    }
}

impl From<mity_storage::StorageError> for Error {
    fn from(err: mity_storage::StorageError) -> Self {
        use mity_storage::StorageError;

        match err {
            StorageError::Init(message) => Error::config(message),
            err => Error::external("storage", err.to_string()).with_source(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use mity_storage::StorageError;

    use super::*;

    #[test]
    fn config_error() {
        let error = Error::config("GCS_BUCKET_NAME is required");
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "GCS_BUCKET_NAME is required");
        assert_eq!(error.to_string(), "config error: GCS_BUCKET_NAME is required");
    }

    #[test]
    fn storage_init_is_config_error() {
        let error = Error::from(StorageError::init("GCP_PROJECT_ID is required"));
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "GCP_PROJECT_ID is required");
    }

    #[test]
    fn storage_failure_is_external_error() {
        let error = Error::from(StorageError::read("connection reset"));
        assert_eq!(error.kind(), ErrorKind::External);
        assert!(error.to_string().contains("storage"));
        assert!(error.to_string().contains("connection reset"));
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn error_kind_as_str() {
        assert_eq!(ErrorKind::Config.as_str(), "config");
        assert_eq!(ErrorKind::External.as_str(), "external_service");
        assert_eq!(ErrorKind::Internal.as_str(), "internal_service");
    }
}
