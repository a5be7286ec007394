//! OpenAPI specification served with a Scalar UI.
//!
//! The document is generated from the [`ApiRouter`] routes and their
//! `*_docs` transforms. Routes that extract `AuthState` are marked with the
//! `bearerAuth` security scheme.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, OpenApi, SecurityScheme};
use aide::scalar::Scalar;
use aide::transform::TransformOpenApi;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Name of the bearer token security scheme.
pub const BEARER_AUTH: &str = "bearerAuth";

/// Paths of the OpenAPI JSON document and the Scalar UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path which exposes the OpenAPI JSON specification.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to serve its OpenAPI document.
pub trait RouterOpenApiExt<S> {
    /// Adds the JSON and Scalar routes and finishes the document.
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info: api_info(),
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router
            .finish_api_with(&mut api, with_bearer_auth)
            .layer(Extension(api))
    }
}

fn api_info() -> Info {
    Info {
        title: "UniTeam API".to_owned(),
        summary: Some("University project management".to_owned()),
        description: Some(
            "Students form teams around academic projects, lecturers supervise them and \
             publish project templates, and administrators manage accounts."
                .to_owned(),
        ),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        ..Info::default()
    }
}

fn with_bearer_auth(api: TransformOpenApi<'_>) -> TransformOpenApi<'_> {
    api.security_scheme(
        BEARER_AUTH,
        SecurityScheme::Http {
            scheme: "bearer".to_owned(),
            bearer_format: Some("JWT".to_owned()),
            description: Some("Access token returned by `POST /auth/login/`.".to_owned()),
            extensions: Default::default(),
        },
    )
}
