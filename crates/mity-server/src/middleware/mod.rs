//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security (CORS, body limits)
//! - Observability (tracing, request IDs)
//! - Recovery (panics, timeouts, service errors)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use mity_server::middleware::{
//!     BodyLimitConfig, CorsConfig, RecoveryConfig, RouterObservabilityExt,
//!     RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default(), &BodyLimitConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{DEFAULT_REQUEST_TIMEOUT_SECS, RecoveryConfig, RouterRecoveryExt};
pub use security::{BodyLimitConfig, CorsConfig, DEFAULT_MAX_UPLOAD_SIZE, RouterSecurityExt};
