//! All `aide::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,no_run
//! use uniteam_server::handler::routes;
//! use uniteam_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use uniteam_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example(config: ServiceConfig) -> anyhow::Result<()> {
//! let state = ServiceState::new(&config).await?;
//! let app: axum::Router = routes(state.clone())
//!     .with_open_api(&OpenApiConfig::default())
//!     .with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod health;
mod invitations;
mod milestone_templates;
mod milestones;
mod profiles;
mod project_templates;
mod projects;
pub mod request;
pub mod response;
mod team_memberships;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all private routes.
fn private_routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(accounts::routes())
        .merge(profiles::routes())
        .merge(projects::routes())
        .merge(team_memberships::routes())
        .merge(milestones::routes())
        .merge(invitations::routes())
        .merge(project_templates::routes())
        .merge(milestone_templates::routes())
}

/// Returns an [`ApiRouter`] with all public routes.
fn public_routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(authentication::routes())
        .merge(health::routes())
}

/// Returns an [`ApiRouter`] with all routes.
///
/// Private routes require a valid access token; unknown paths answer with a
/// `not_found` error body.
pub fn routes(state: ServiceState) -> ApiRouter<ServiceState> {
    let private_router = private_routes().with_authentication(state);

    ApiRouter::new()
        .merge(private_router)
        .merge(public_routes())
        .fallback(handler)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use super::*;
    use crate::middleware::{OpenApiConfig, RouterOpenApiExt};
    use crate::service::tests::test_state;

    /// Returns a [`TestServer`] over every route and the OpenAPI document.
    fn create_test_server() -> anyhow::Result<TestServer> {
        let state = test_state();
        let app: axum::Router = routes(state.clone())
            .with_open_api(&OpenApiConfig::default())
            .with_state(state);
        Ok(TestServer::new(app)?)
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/no-such-route/").await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn private_routes_require_a_token() -> anyhow::Result<()> {
        let server = create_test_server()?;

        for path in ["/projects/", "/auth/me/", "/invitations/", "/project-templates/"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
        }

        let error = server.get("/milestones/").await.json::<serde_json::Value>();
        assert_eq!(error["name"], "missing_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_tokens_are_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server
            .get("/accounts/")
            .authorization_bearer("not-a-jwt")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn health_is_public() -> anyhow::Result<()> {
        let server = create_test_server()?;

        server.get("/health/").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn serves_openapi_document() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status_ok();

        let document = response.json::<serde_json::Value>();
        let paths = &document["paths"];
        for path in [
            "/auth/login/",
            "/projects/{projectId}/",
            "/team-memberships/{membershipId}/change-role/",
            "/invitations/{invitationId}/accept/",
            "/milestone-templates/",
        ] {
            assert!(paths.get(path).is_some(), "missing {path}");
        }

        let scheme = &document["components"]["securitySchemes"]["bearerAuth"];
        assert_eq!(scheme["scheme"], "bearer");
        Ok(())
    }
}
