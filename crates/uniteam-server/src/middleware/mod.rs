//! Middleware for `axum::Router` and HTTP request processing.
//!
//! ```rust,no_run
//! use axum::Router;
//! use uniteam_server::middleware::{
//!     MiddlewareConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let config = MiddlewareConfig::default();
//! let app: Router = Router::new()
//!     .with_security(&config.cors)
//!     .with_observability()
//!     .with_recovery(&config.recovery);
//! ```

mod authentication;
mod observability;
mod recovery;
mod security;
mod specification;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

pub use crate::middleware::authentication::{RouterAuthExt, require_authentication};
pub use crate::middleware::observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use crate::middleware::recovery::{RecoveryConfig, RouterRecoveryExt};
pub use crate::middleware::security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
pub use crate::middleware::specification::{BEARER_AUTH, OpenApiConfig, RouterOpenApiExt};

/// Middleware configuration combining CORS, OpenAPI and recovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct MiddlewareConfig {
    #[cfg_attr(feature = "config", command(flatten))]
    pub cors: CorsConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub openapi: OpenApiConfig,

    #[cfg_attr(feature = "config", command(flatten))]
    pub recovery: RecoveryConfig,
}
