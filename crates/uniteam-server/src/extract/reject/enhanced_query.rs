//! Query string extractor.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::truncate_rejection;
use crate::handler::{Error, ErrorKind};

/// Replacement for [`axum::extract::Query`], used for filters and pagination.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumQuery(inner) = AxumQuery::<T>::from_request_parts(parts, state).await?;
        Ok(Self(inner))
    }
}

impl From<QueryRejection> for Error<'static> {
    fn from(rejection: QueryRejection) -> Self {
        let details = rejection.body_text();
        let message = match backticked(&details) {
            Some(field) if details.contains("missing field") => {
                format!("Missing required query parameter '{field}'")
            }
            Some(field) if details.contains("duplicate field") => {
                format!("Query parameter '{field}' was given more than once")
            }
            _ => "Invalid query parameters".to_owned(),
        };

        ErrorKind::BadRequest
            .with_message(message)
            .with_context(truncate_rejection(&details, 2, 200))
    }
}

/// Returns the first `` `quoted` `` name in a serde error message.
fn backticked(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

impl<T> aide::OperationInput for Query<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumQuery::<T>::operation_input(ctx, operation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_backticked_field() {
        assert_eq!(backticked("missing field `limit`"), Some("limit"));
        assert_eq!(backticked("invalid digit found in string"), None);
    }
}
