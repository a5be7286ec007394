#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Migrations compiled into the binary from `src/migrations`.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./src/migrations");

/// Tracing target for client initialization and lifecycle events.
pub const TRACING_TARGET_CLIENT: &str = "uniteam_postgres::client";

/// Tracing target for query execution.
pub const TRACING_TARGET_QUERY: &str = "uniteam_postgres::queries";

/// Tracing target for migration application and status checks.
pub const TRACING_TARGET_MIGRATION: &str = "uniteam_postgres::migrations";

/// Tracing target for connection establishment and pool management.
pub const TRACING_TARGET_CONNECTION: &str = "uniteam_postgres::connection";

mod client;
pub mod model;
pub mod query;
mod schema;
pub mod types;

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::ConnectionError;
use diesel::result::Error;
pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, MigrationStatus, PgClient, PgClientMigrationExt, PgConfig,
    PgConn, PgPoolStatus, PooledConnection, get_applied_migrations, get_migration_status,
    run_pending_migrations,
};
use crate::types::ConstraintViolation;

pub mod error {
    //! Error re-exports and helpers shared by the database layer.
    //!
    //! [`PgError`] is the main error type of this crate.
    //!
    //! [`PgError`]: crate::PgError

    use std::borrow::Cow;

    pub use deadpool::managed::TimeoutType;
    pub use diesel::result::{ConnectionError as DieselConnectionError, Error as DieselError};
    pub use diesel_async::pooled_connection::PoolError as DieselPoolError;
    pub use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

    /// Type-erased error used by migrations.
    pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

    /// Operator-facing hint attached to an error.
    pub trait ErrorHint {
        /// Returns a short remediation hint.
        fn hint(&self) -> Cow<'static, str>;
    }

    impl ErrorHint for TimeoutType {
        fn hint(&self) -> Cow<'static, str> {
            match self {
                TimeoutType::Wait => Cow::Borrowed(
                    "All pooled connections are busy, raise POSTGRES_MAX_CONNECTIONS or shorten transactions",
                ),
                TimeoutType::Create => Cow::Borrowed(
                    "Could not open a new connection, check POSTGRES_URL and that the server is reachable",
                ),
                TimeoutType::Recycle => Cow::Borrowed(
                    "A pooled connection could not be recycled and will be discarded",
                ),
            }
        }
    }
}

/// Errors produced by the database layer.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Waiting for, creating or recycling a pooled connection timed out.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// The connection could not be established or was lost.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Applying the embedded migrations failed.
    #[error("Database migration error: {0}")]
    Migration(error::BoxError),

    /// A query failed, including constraint violations.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Anything not covered above.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns the name of the violated constraint, if any.
    pub fn constraint(&self) -> Option<&str> {
        let PgError::Query(Error::DatabaseError(_, info)) = self else {
            return None;
        };

        info.constraint_name()
    }

    /// Returns the violated constraint as a typed [`ConstraintViolation`].
    ///
    /// Unknown constraint names yield `None`.
    pub fn constraint_violation(&self) -> Option<ConstraintViolation> {
        self.constraint().and_then(ConstraintViolation::new)
    }

    /// Returns whether the row lookup came back empty.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PgError::Query(Error::NotFound))
    }

    /// Returns whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_)
                | PgError::Connection(ConnectionError::BadConnection(_))
                | PgError::Query(Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::SerializationFailure,
                    _
                ))
        )
    }
}

impl From<error::DeadpoolError> for PgError {
    fn from(value: error::DeadpoolError) -> Self {
        use error::{DeadpoolError, DieselPoolError};

        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                tracing::warn!(target: TRACING_TARGET_CONNECTION, error = %err, "Post-create hook rejected a connection");
                Self::Unexpected(err.to_string().into())
            }
            DeadpoolError::NoRuntimeSpecified => {
                tracing::error!(target: TRACING_TARGET_CONNECTION, "Connection pool has no async runtime");
                Self::Unexpected("No runtime specified".into())
            }
            DeadpoolError::Closed => Self::Connection(ConnectionError::InvalidConnectionUrl(
                "Connection pool is closed".into(),
            )),
        }
    }
}

/// [`Result`] alias with [`PgError`] as the default error.
pub type PgResult<T, E = PgError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

    use super::*;
    use crate::types::InvitationConstraints;

    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: Option<&'static str>) -> PgError {
        PgError::Query(Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Info(constraint)),
        ))
    }

    #[test]
    fn extracts_constraint_violation() {
        let error = unique_violation(Some("invitations_project_receiver_unique"));
        assert_eq!(
            error.constraint(),
            Some("invitations_project_receiver_unique")
        );
        assert_eq!(
            error.constraint_violation(),
            Some(ConstraintViolation::Invitation(
                InvitationConstraints::ProjectReceiverUnique
            ))
        );
    }

    #[test]
    fn unknown_or_missing_constraint() {
        assert!(unique_violation(Some("mystery_idx")).constraint_violation().is_none());
        assert!(unique_violation(None).constraint().is_none());
        assert!(PgError::Config("x".into()).constraint().is_none());
    }

    #[test]
    fn not_found_and_transient() {
        assert!(PgError::Query(Error::NotFound).is_not_found());
        assert!(!PgError::Query(Error::NotFound).is_transient());
        assert!(PgError::Timeout(TimeoutType::Wait).is_transient());
    }
}
