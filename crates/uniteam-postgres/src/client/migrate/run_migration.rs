use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::{MigrationResult, get_migration_status};
use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applies every pending embedded migration.
///
/// Safe to call repeatedly; an up-to-date schema yields an empty result.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    let started = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;

    let status = get_migration_status(&mut conn).await?;
    if status.is_up_to_date() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = status.applied_migrations(),
            "Database schema is up to date"
        );
        return Ok(MigrationResult::success(started.elapsed(), vec![]));
    }

    if conn.is_broken() {
        return Err(PgError::Migration(
            "connection is broken, refusing to run migrations".into(),
        ));
    }

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        pending = ?status.pending_versions,
        "Applying pending migrations"
    );

    // The migration harness is synchronous, so it runs on the blocking pool.
    let mut wrapper: AsyncConnectionWrapper<_> = conn.into();
    let versions = spawn_blocking(move || {
        wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect::<Vec<_>>())
    })
    .await
    .map_err(|err| PgError::Migration(err.into()))?
    .map_err(|err| {
        tracing::error!(target: TRACING_TARGET_MIGRATION, error = %err, "Migration failed");
        PgError::Migration(err)
    })?;

    let duration = started.elapsed();
    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration_ms = duration.as_millis(),
        applied = versions.len(),
        "Database migrations applied"
    );

    Ok(MigrationResult::success(duration, versions))
}
