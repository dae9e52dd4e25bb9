//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use mity_server::handler::routes;
//! use mity_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::new("my-project", "my-bucket");
//! let state = ServiceState::from_config(&config)?;
//! let router: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod files;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

/// Answers requests that match no route.
async fn not_found() -> Error<'static> {
    ErrorKind::NotFound.into_error()
}

/// Answers requests to a known route with an unsupported method.
async fn method_not_allowed() -> Error<'static> {
    ErrorKind::MethodNotAllowed.into_error()
}

/// Returns a [`Router`] with every route of the storage proxy.
///
/// The router still needs a [`ServiceState`] before it can be served.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(monitors::routes())
        .merge(files::routes())
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}
