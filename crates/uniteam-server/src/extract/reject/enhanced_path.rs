//! Path parameter extractor.

use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path as AxumPath};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use super::truncate_rejection;
use crate::handler::{Error, ErrorKind};

/// Replacement for [`axum::extract::Path`].
///
/// Every id in this API is a UUID, so malformed parameters get a hint about
/// the expected format.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(inner) = AxumPath::<T>::from_request_parts(parts, state).await?;
        Ok(Self(inner))
    }
}

impl From<PathRejection> for Error<'static> {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                let details = truncate_rejection(&err.body_text(), 2, 150);
                ErrorKind::BadRequest
                    .with_message("Invalid path parameter")
                    .with_context(format!("{details}. Identifiers must be UUIDs"))
            }
            PathRejection::MissingPathParams(err) => ErrorKind::MissingPathParam
                .with_message("Required path parameter missing")
                .with_context(truncate_rejection(&err.body_text(), 2, 150)),
            _ => ErrorKind::InternalServerError.with_message("Failed to process path parameters"),
        }
    }
}

impl<T> aide::OperationInput for Path<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        AxumPath::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        AxumPath::<T>::inferred_early_responses(ctx, operation)
    }
}
