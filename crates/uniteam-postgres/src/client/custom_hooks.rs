//! Connection setup and pool lifecycle hooks.

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::PgConfig;
use crate::TRACING_TARGET_CONNECTION;

/// Establishes a new connection, logging how long it took.
///
/// Installed as the [`ManagerConfig::custom_setup`] callback.
///
/// [`ManagerConfig::custom_setup`]: diesel_async::pooled_connection::ManagerConfig
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let started = Instant::now();
    let addr_masked = PgConfig::mask_url(addr);

    async move {
        let result = C::establish(addr).await;
        let elapsed_ms = started.elapsed().as_millis();

        match &result {
            Ok(_) => tracing::info!(
                target: TRACING_TARGET_CONNECTION,
                hook = "setup_callback",
                addr = %addr_masked,
                elapsed_ms,
                "Database connection established"
            ),
            Err(err) => tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                hook = "setup_callback",
                addr = %addr_masked,
                elapsed_ms,
                error = %err,
                "Failed to establish database connection"
            ),
        }

        result
    }
    .boxed()
}

/// Runs after a connection joins the pool.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    log_connection_state("post_create", conn, metrics);
    Ok(())
}

/// Runs before a pooled connection is handed out again.
pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    log_connection_state("pre_recycle", conn, metrics);
    Ok(())
}

/// Runs after a pooled connection was recycled.
pub fn post_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    log_connection_state("post_recycle", conn, metrics);
    Ok(())
}

fn log_connection_state(hook: &'static str, conn: &mut AsyncPgConnection, metrics: &Metrics) {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            hook,
            recycle_count = metrics.recycle_count,
            "Pooled connection is broken"
        );
        return;
    }

    tracing::trace!(
        target: TRACING_TARGET_CONNECTION,
        hook,
        created_at = ?metrics.created,
        recycle_count = metrics.recycle_count,
        "Pooled connection is healthy"
    );
}
