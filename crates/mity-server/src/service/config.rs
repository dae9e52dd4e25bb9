#[cfg(feature = "config")]
use clap::Args;
use mity_storage::{DEFAULT_OPERATION_TIMEOUT_SECS, GcsConfig, ObjectStorage, ObjectStoreClient};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::service::StorageService;

/// Tracing target for service configuration.
const TRACING_TARGET: &str = "mity_server::service::config";

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Google Cloud project identifier.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "GCP_PROJECT_ID", default_value = "")
    )]
    pub gcp_project_id: String,

    /// Name of the bucket every object key is resolved against.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "GCS_BUCKET_NAME", default_value = "")
    )]
    pub gcs_bucket_name: String,

    /// Base64 encoded service account JSON.
    ///
    /// Ambient credentials are used when unset or empty.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS", hide_env_values = true)
    )]
    pub google_credentials: Option<String>,

    /// Deadline for a single object store operation, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "STORAGE_TIMEOUT", default_value = "120")
    )]
    pub storage_timeout: u64,
}

impl ServiceConfig {
    /// Creates a configuration for the given project and bucket.
    pub fn new(project_id: impl Into<String>, bucket_name: impl Into<String>) -> Self {
        Self {
            gcp_project_id: project_id.into(),
            gcs_bucket_name: bucket_name.into(),
            google_credentials: None,
            storage_timeout: DEFAULT_OPERATION_TIMEOUT_SECS,
        }
    }

    /// Returns the object store configuration.
    pub fn gcs_config(&self) -> GcsConfig {
        let config = GcsConfig::new(&self.gcp_project_id, &self.gcs_bucket_name)
            .with_operation_timeout(self.storage_timeout);

        match self
            .google_credentials
            .as_deref()
            .map(str::trim)
            .filter(|credential| !credential.is_empty())
        {
            Some(credential) => config.with_credential(credential),
            None => config,
        }
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the project or bucket is missing, the
    /// credentials are not valid base64, or the store timeout is zero.
    pub fn validate(&self) -> Result<()> {
        self.gcs_config().validate()?;
        Ok(())
    }

    /// Opens the object store session shared by every request.
    pub fn connect_storage(&self) -> Result<StorageService> {
        let config = self.gcs_config();
        let client = ObjectStoreClient::connect(&config)?;

        tracing::debug!(
            target: TRACING_TARGET,
            bucket = %config.bucket,
            project_id = %config.project_id,
            "object store session opened"
        );

        Ok(StorageService::new(ObjectStorage::new(client)))
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("gcp_project_id", &self.gcp_project_id)
            .field("gcs_bucket_name", &self.gcs_bucket_name)
            .field(
                "google_credentials",
                &self.google_credentials.as_ref().map(|_| "<redacted>"),
            )
            .field("storage_timeout", &self.storage_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::ErrorKind;

    use super::*;

    #[test]
    fn empty_credentials_use_ambient_auth() {
        let mut config = ServiceConfig::new("project", "media");
        config.google_credentials = Some("  ".to_owned());

        assert_eq!(config.gcs_config().credential, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_bucket_is_config_error() {
        let config = ServiceConfig::new("project", "");
        let error = config.validate().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "GCS_BUCKET_NAME is required");
    }

    #[test]
    fn invalid_credentials_are_rejected() {
        let mut config = ServiceConfig::new("project", "media");
        config.google_credentials = Some("{not base64}".to_owned());

        let error = config.validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn debug_redacts_credentials() {
        let mut config = ServiceConfig::new("project", "media");
        config.google_credentials = Some("c2VjcmV0".to_owned());

        let debug = format!("{config:?}");
        assert!(!debug.contains("c2VjcmV0"));
        assert!(debug.contains("<redacted>"));
    }
}
