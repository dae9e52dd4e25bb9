//! Middleware configuration for the HTTP server.
//!
//! CORS, request body limit and recovery (timeout/panic handling) settings.
//! All middleware configs are re-exported from `mity-server` and support
//! both CLI arguments and environment variables.
//!
//! # Example
//!
//! ```bash
//! # Allow one origin and cap uploads at 10 MiB
//! mity-cli --cors-origins "https://example.com" --max-upload-size 10485760
//! ```

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use mity_server::middleware::{BodyLimitConfig, CorsConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound accepted for the request timeout, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 3600;

/// Middleware configuration combining CORS, body limit, and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Request body size limit.
    #[clap(flatten)]
    pub body_limit: BodyLimitConfig,

    /// Recovery middleware configuration.
    ///
    /// Controls request timeout and panic recovery behavior.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the middleware settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the body limit is zero or the request timeout is
    /// outside 1-3600 seconds.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.body_limit.max_upload_size == 0 {
            return Err(anyhow!("Maximum upload size must be greater than zero."));
        }

        let timeout = self.recovery.request_timeout;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT_SECS {
            return Err(anyhow!(
                "Request timeout {timeout} seconds is invalid. Must be between 1 and {MAX_REQUEST_TIMEOUT_SECS} seconds."
            ));
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_upload_size = self.body_limit.max_upload_size,
            request_timeout_secs = self.recovery.request_timeout,
            "Request limits"
        );
    }
}
