//! Bearer token extraction.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use derive_more::Deref;

use super::{AuthClaims, TokenKind};
use crate::handler::{Error, ErrorKind};
use crate::service::SessionKeys;

/// Verified access token claims taken from `Authorization: Bearer`.
///
/// Only the signature and the standard claims are checked here; use
/// [`AuthState`] to also verify the account against the database.
///
/// [`AuthState`]: crate::extract::AuthState
#[must_use]
#[derive(Debug, Clone, Deref)]
pub struct AuthHeader(AuthClaims);

impl AuthHeader {
    #[inline]
    pub fn into_auth_claims(self) -> AuthClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(auth_header.clone());
        }

        type AuthBearerHeader = TypedHeader<Authorization<Bearer>>;
        let bearer_header = match AuthBearerHeader::from_request_parts(parts, state).await {
            Ok(bearer_header) => bearer_header,
            Err(rejection) => {
                let error = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => ErrorKind::MissingAuthToken
                        .with_message("Authentication required")
                        .with_context("Missing Authorization header with Bearer token"),
                    TypedHeaderRejectionReason::Error(_) => ErrorKind::MalformedAuthToken
                        .with_message("Invalid token format")
                        .with_context("Authorization header must contain a valid Bearer token"),
                    _ => ErrorKind::InternalServerError
                        .with_message("Authentication processing failed")
                        .with_context("Unexpected error during header extraction"),
                };
                return Err(error.with_resource("authentication"));
            }
        };

        let session_keys = SessionKeys::from_ref(state);
        let auth_claims = AuthClaims::decode(
            bearer_header.token(),
            session_keys.decoding_key(),
            TokenKind::Access,
        )?;

        let auth_header = Self(auth_claims);
        parts.extensions.insert(auth_header.clone());
        Ok(auth_header)
    }
}

impl aide::OperationInput for AuthHeader {}
