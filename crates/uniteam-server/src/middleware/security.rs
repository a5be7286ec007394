//! CORS and request body limits.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderValue};
use axum::http::Method;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Tracing target for security middleware.
const TRACING_TARGET: &str = "uniteam_server::middleware::security";

/// Maximum accepted request body: 1MB.
///
/// Every payload of this API is a small JSON document.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Origins allowed when none are configured.
const DEVELOPMENT_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS rules, protective response headers and a body limit.
    fn with_security(self, cors: &CorsConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.to_header_values())
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(cors.allow_credentials)
            .max_age(cors.max_age());

        self.layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Allowed origins. Localhost development origins are used when empty.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')
    )]
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Maximum age for preflight responses in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,

    /// Whether cross-origin requests may carry credentials.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value = "true")
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Returns the preflight max age as a [`Duration`].
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Parses the configured origins, skipping invalid ones.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return DEVELOPMENT_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect();
        }

        self.allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        origin = %origin,
                        "Ignoring invalid CORS origin"
                    );
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_development_origins() {
        let origins = CorsConfig::default().to_header_values();
        assert_eq!(origins.len(), DEVELOPMENT_ORIGINS.len());
        assert_eq!(origins[0], "http://localhost:3000");
    }

    #[test]
    fn skips_invalid_origins() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://uniteam.example".to_owned(),
                "bad\norigin".to_owned(),
            ],
            ..CorsConfig::default()
        };

        let origins = config.to_header_values();
        assert_eq!(origins, vec![HeaderValue::from_static("https://uniteam.example")]);
    }
}
