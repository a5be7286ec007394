//! Authentication middleware for private routes.

use aide::axum::ApiRouter;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthState;
use crate::service::ServiceState;

/// Extension trait for [`ApiRouter`] to require authentication.
pub trait RouterAuthExt {
    /// Requires a valid access token for every route added so far.
    ///
    /// Applied as a route layer, so unmatched paths still reach the
    /// fallback and answer `404` instead of `401`.
    fn with_authentication(self, state: ServiceState) -> Self;
}

impl RouterAuthExt for ApiRouter<ServiceState> {
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Rejects the request unless [`AuthState`] can be extracted.
///
/// The verified caller is cached in the request extensions, so handlers
/// extracting [`AuthState`] again do not repeat the account lookup.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
