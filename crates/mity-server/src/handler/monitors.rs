//! Health check handler.

use axum::Router;
use axum::routing::get;

use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "mity_server::handler::monitors";

/// Liveness probe; answers as long as the process serves requests.
async fn health() -> &'static str {
    tracing::trace!(target: TRACING_TARGET, "Health check requested");
    "OK"
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}
