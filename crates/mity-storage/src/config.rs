//! Google Cloud Storage configuration.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Default timeout for a single object store operation, in seconds.
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 120;

/// Google Cloud Storage configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcsConfig {
    /// Google Cloud project identifier.
    pub project_id: String,
    /// Bucket name.
    pub bucket: String,
    /// Base64 encoded service account JSON.
    ///
    /// Ambient credentials (metadata server, well-known file) are used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Timeout for a single object store operation, in seconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout: u64,
}

fn default_operation_timeout() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_SECS
}

impl GcsConfig {
    /// Creates a new GCS configuration.
    pub fn new(project_id: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            bucket: bucket.into(),
            credential: None,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT_SECS,
        }
    }

    /// Sets the base64 encoded service account credentials.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// Sets the per-operation timeout in seconds.
    pub fn with_operation_timeout(mut self, secs: u64) -> Self {
        self.operation_timeout = secs;
        self
    }

    /// Returns the per-operation timeout as a `Duration`.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout)
    }

    /// Validates the configuration.
    ///
    /// The project and bucket are required, and the credentials, when present,
    /// must be valid base64.
    pub fn validate(&self) -> StorageResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(StorageError::init("GCP_PROJECT_ID is required"));
        }

        if self.bucket.trim().is_empty() {
            return Err(StorageError::init("GCS_BUCKET_NAME is required"));
        }

        if let Some(credential) = self.credential.as_deref()
            && let Err(err) = STANDARD.decode(credential.trim())
        {
            return Err(StorageError::init(format!(
                "credentials are not valid base64: {err}"
            )));
        }

        if self.operation_timeout == 0 {
            return Err(StorageError::init(
                "storage operation timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for GcsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsConfig")
            .field("project_id", &self.project_id)
            .field("bucket", &self.bucket)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}
