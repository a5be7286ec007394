//! Connection pooling, configuration and migrations.

pub(crate) mod custom_hooks;
pub mod migrate;
mod pg_client;
mod pg_config;

use deadpool::managed::{Object, Pool};
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
pub use migrate::{
    MigrationResult, MigrationStatus, PgClientMigrationExt, get_applied_migrations,
    get_migration_status, run_pending_migrations,
};
pub use pg_client::{PgClient, PgConn, PgPoolStatus};
pub use pg_config::PgConfig;

/// Connection pool shared by the whole application.
pub type ConnectionPool = Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Connection checked out of the [`ConnectionPool`].
pub type PooledConnection = Object<AsyncDieselConnectionManager<AsyncPgConnection>>;
