//! Service health handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use uniteam_postgres::PgClient;

use crate::extract::Json;
use crate::handler::response::{Health, HealthStatus};
use crate::service::ServiceState;

/// Tracing target for health checks.
const TRACING_TARGET: &str = "uniteam_server::handler::health";

/// Reports liveness and connection pool counters.
///
/// Never checks a connection out of the pool, so it answers even when the
/// database is unreachable.
#[tracing::instrument(skip_all)]
async fn health_status(State(pg_client): State<PgClient>) -> (StatusCode, Json<Health>) {
    let health = Health::from_pool_status(pg_client.pool_status());

    if health.status == HealthStatus::Degraded {
        tracing::warn!(
            target: TRACING_TARGET,
            waiting = health.database.waiting,
            available = health.database.available,
            "Requests are waiting for database connections"
        );
    } else {
        tracing::debug!(target: TRACING_TARGET, "Health check passed");
    }

    (StatusCode::OK, Json(health))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health status")
        .description("Reports liveness, application version and connection pool usage.")
        .response::<200, Json<Health>>()
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/health/", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("Health"))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;

    use super::*;
    use crate::service::tests::test_state;

    #[tokio::test]
    async fn reports_pool_without_database() -> anyhow::Result<()> {
        let app: axum::Router = routes().with_state(test_state()).into();
        let server = TestServer::new(app)?;

        let response = server.get("/health/").await;
        response.assert_status_ok();

        let health = response.json::<Health>();
        assert_eq!(health.status, HealthStatus::Healthy);
        assert_eq!(health.database.waiting, 0);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        Ok(())
    }
}
