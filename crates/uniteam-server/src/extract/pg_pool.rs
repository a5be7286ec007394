//! Database connection extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use uniteam_postgres::{PgClient, PgConn};

use crate::handler::{Error, ErrorKind};

/// A pooled connection checked out for the duration of the request.
///
/// Repository traits are called on it directly.
#[derive(Debug, Deref, DerefMut)]
pub struct PgPool(pub PgConn);

impl<S> FromRequestParts<S> for PgPool
where
    PgClient: FromRef<S>,
    S: Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pg_client = PgClient::from_ref(state);
        let conn = pg_client.get_connection().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to acquire database connection");
            ErrorKind::InternalServerError
                .with_message("Database connection unavailable")
                .with_resource("database")
        })?;

        Ok(PgPool(conn))
    }
}

impl aide::OperationInput for PgPool {}
