//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary and applied at startup through
//! [`run_pending_migrations`] or the [`PgClientMigrationExt`] extension trait.

mod client_ext;
mod migrate_result;
mod run_migration;
mod run_utility;

pub use client_ext::PgClientMigrationExt;
pub use migrate_result::{MigrationResult, MigrationStatus};
pub use run_migration::run_pending_migrations;
pub use run_utility::{get_applied_migrations, get_migration_status};
