//! Conversion of database failures into handler errors.
//!
//! Known constraint violations become client errors through the per-table
//! conversions in the sibling `pg_*` modules; everything else is logged and
//! reported as an internal error.

use uniteam_postgres::PgError;
use uniteam_postgres::error::{DieselError, ErrorHint};
use uniteam_postgres::types::ConstraintViolation;

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "uniteam_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Account(c) => c.into(),
            ConstraintViolation::Profile(c) => c.into(),
            ConstraintViolation::ProjectTemplate(c) => c.into(),
            ConstraintViolation::MilestoneTemplate(c) => c.into(),
            ConstraintViolation::Project(c) => c.into(),
            ConstraintViolation::Team(c) => c.into(),
            ConstraintViolation::TeamMember(c) => c.into(),
            ConstraintViolation::Milestone(c) => c.into(),
            ConstraintViolation::MilestoneAssignee(c) => c.into(),
            ConstraintViolation::Invitation(c) => c.into(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "Database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    hint = %timeout.hint(),
                    "Database timeout"
                );
                ErrorKind::InternalServerError
                    .with_message("The database is busy")
                    .with_suggestion("Retry the request shortly")
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "Database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "Database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint) = error.constraint_violation() {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        constraint = %constraint,
                        category = ?constraint.constraint_category(),
                        error = %query_error,
                        "Query rejected by constraint"
                    );
                    return constraint.into();
                }

                if error.is_not_found() {
                    return ErrorKind::NotFound.into_error();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "Query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "Unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

// Used only for transactions.
impl From<DieselError> for Error<'static> {
    fn from(error: DieselError) -> Self {
        PgError::from(error).into()
    }
}

#[cfg(test)]
mod tests {
    use uniteam_postgres::types::{InvitationConstraints, TeamMemberConstraints};

    use super::*;

    #[test]
    fn duplicate_invitation_is_bad_request() {
        let error = Error::from(ConstraintViolation::Invitation(
            InvitationConstraints::ProjectReceiverUnique,
        ));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.resource(), Some("invitation"));
    }

    #[test]
    fn duplicate_membership_is_conflict() {
        let error = Error::from(ConstraintViolation::TeamMember(
            TeamMemberConstraints::TeamAccountUnique,
        ));
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("team_member"));
    }

    #[test]
    fn missing_row_is_not_found() {
        let error = Error::from(DieselError::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn infrastructure_failures_are_internal() {
        let error = Error::from(PgError::Unexpected("pool closed".into()));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        let error = Error::from(PgError::Config("missing url".into()));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
