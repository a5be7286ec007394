//! Request tracing with propagated request ids.

use axum::Router;
use axum::http::HeaderName;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Assigns every request an id, echoes it in the response and wraps the
    /// request in a tracing span with the `Authorization` header redacted.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

        self.layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetSensitiveRequestHeadersLayer::new([header::AUTHORIZATION]))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    #[tokio::test]
    async fn responses_carry_request_id() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .with_observability();
        let server = TestServer::new(app)?;

        let response = server.get("/ping").await;
        response.assert_status_ok();
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        Ok(())
    }
}
