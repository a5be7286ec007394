use super::{MigrationResult, MigrationStatus, get_migration_status, run_pending_migrations};
use crate::{PgClient, PgResult};

/// Migration helpers available directly on [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies every pending migration.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;

    /// Reports applied and pending migrations.
    fn get_migration_status(&self) -> impl Future<Output = PgResult<MigrationStatus>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }

    async fn get_migration_status(&self) -> PgResult<MigrationStatus> {
        let mut conn = self.get_pooled_connection().await?;
        get_migration_status(&mut conn).await
    }
}
