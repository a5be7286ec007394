//! HTTP server startup and lifecycle.

mod error;
mod shutdown;

use std::future::IntoFuture;
use std::time::Instant;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub use self::error::{ServerError, ServerResult};
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until a shutdown signal.
///
/// After the signal, in-flight requests get `SHUTDOWN_TIMEOUT` seconds to
/// finish before the server stops regardless.
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    config.validate()?;

    let server_addr = config.server_addr();
    let listener = TcpListener::bind(server_addr).await.map_err(|source| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %source,
            "Failed to bind to address"
        );
        ServerError::BindError {
            address: server_addr.to_string(),
            source,
        }
    })?;

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces, ensure firewall rules are configured"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is listening for connections"
    );

    let shutdown_timeout = config.shutdown_timeout();
    let start_time = Instant::now();
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %err,
                    "Server encountered an error"
                );
                ServerError::Runtime(err)
            })?;
        }
        () = drain_deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = shutdown_timeout.as_secs(),
                "Shutdown timeout elapsed, dropping remaining connections"
            );
        }
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        uptime_secs = start_time.elapsed().as_secs(),
        "Server shut down"
    );

    Ok(())
}
