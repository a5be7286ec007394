use diesel::migration::MigrationSource;
use diesel::pg::Pg;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use super::MigrationStatus;
use crate::{MIGRATIONS, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Versions of every migration embedded in the binary, oldest first.
pub(crate) fn embedded_migration_versions() -> PgResult<Vec<String>> {
    let migrations = MigrationSource::<Pg>::migrations(&MIGRATIONS).map_err(PgError::Migration)?;
    let mut versions = migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .collect::<Vec<_>>();

    versions.sort();
    Ok(versions)
}

/// Compares the embedded migrations with the ones recorded in the database.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_migration_status(conn: &mut AsyncPgConnection) -> PgResult<MigrationStatus> {
    let embedded = embedded_migration_versions()?;
    let applied = get_applied_migrations(conn).await?;
    let status = MigrationStatus::from_versions(&embedded, applied);

    tracing::debug!(
        target: TRACING_TARGET_MIGRATION,
        applied = status.applied_migrations(),
        pending = status.pending_migrations(),
        "Migration status retrieved"
    );

    Ok(status)
}

/// Versions recorded in `__diesel_schema_migrations`.
///
/// Returns an empty list on a fresh database.
pub async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    #[derive(diesel::QueryableByName)]
    struct Exists {
        #[diesel(sql_type = diesel::sql_types::Bool)]
        exists: bool,
    }

    #[derive(diesel::QueryableByName)]
    struct Version {
        #[diesel(sql_type = diesel::sql_types::Text)]
        version: String,
    }

    let table = diesel::sql_query(
        "SELECT EXISTS (SELECT FROM information_schema.tables \
         WHERE table_name = '__diesel_schema_migrations') AS exists",
    )
    .get_result::<Exists>(conn)
    .await?;

    if !table.exists {
        return Ok(Vec::new());
    }

    let versions = diesel::sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<Version>(conn)
        .await?
        .into_iter()
        .map(|row| row.version)
        .collect();

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_versions_are_sorted_and_present() -> PgResult<()> {
        let versions = embedded_migration_versions()?;
        assert!(versions.len() >= 5);
        assert!(versions.windows(2).all(|pair| pair[0] <= pair[1]));
        Ok(())
    }
}
