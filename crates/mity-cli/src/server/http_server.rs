//! HTTP server startup with bounded graceful shutdown.

use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::server::lifecycle::serve_with_shutdown;
use crate::server::shutdown::{drain_deadline, shutdown_signal};
use crate::server::{ServerError, ServerResult};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Starts an HTTP server with graceful shutdown.
///
/// Validates the configuration, binds to the configured address and serves
/// requests until SIGINT or SIGTERM. In-flight requests then get the
/// configured shutdown timeout to finish.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    if let Err(validation_error) = server_config.validate() {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            error = %validation_error,
            "Invalid server configuration"
        );

        return Err(ServerError::invalid_config(&validation_error));
    }

    let server_addr = server_config.server_addr();
    let listener = match TcpListener::bind(server_addr).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                "Successfully bound to address"
            );

            listener
        }
        Err(listener_err) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %server_addr,
                error = %listener_err,
                "Failed to bind to address"
            );

            return Err(ServerError::bind_error(server_addr, listener_err));
        }
    };

    let grace_period = server_config.shutdown_timeout();
    serve_with_shutdown(&server_config, || {
        run_until_shutdown(listener, app, shutdown_signal(), grace_period)
    })
    .await
}

/// Serves `app` on `listener` until `signal` resolves, then drains
/// connections for at most `grace_period`.
pub(crate) async fn run_until_shutdown<S>(
    listener: TcpListener,
    app: Router,
    signal: S,
    grace_period: Duration,
) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let token = CancellationToken::new();
    let trigger = token.clone();

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        signal.await;
        trigger.cancel();
    })
    .into_future();

    tokio::select! {
        result = server => result,
        () = drain_deadline(token, grace_period) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                grace_period_secs = grace_period.as_secs(),
                "Grace period elapsed with requests still in flight, forcing shutdown"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use axum::routing::get;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;

    async fn local_listener() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn stops_when_signal_resolves() {
        let (listener, _) = local_listener().await;
        let app = Router::new().route("/health", get(|| async { "OK" }));

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_until_shutdown(listener, app, async {}, Duration::from_secs(1)),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn grace_period_bounds_stuck_requests() {
        let (listener, addr) = local_listener().await;
        let app = Router::new().route("/stuck", get(|| pending::<&'static str>()));
        let (tx, rx) = oneshot::channel::<()>();

        let server = tokio::spawn(run_until_shutdown(
            listener,
            app,
            async move {
                let _ = rx.await;
            },
            Duration::from_millis(100),
        ));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /stuck HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server).await;

        assert!(matches!(result, Ok(Ok(Ok(())))));
    }
}
