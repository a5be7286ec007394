#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use uniteam_server::handler::routes;
use uniteam_server::middleware::{
    MiddlewareConfig, RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt,
    RouterSecurityExt,
};
use uniteam_server::service::{ServiceConfig, ServiceState};

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "uniteam_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "uniteam_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "uniteam_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();

    cli.server
        .validate()
        .context("invalid server configuration")?;

    let state = create_service_state(&cli.service).await?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Connects to the database, applies migrations and loads session keys.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::new(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): catches panics and enforces timeouts
/// 2. Observability: request ids and tracing spans
/// 3. Security: CORS, response headers, body limit
/// 4. Routes (innermost): OpenAPI document and request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let api_routes: Router = routes(state.clone())
        .with_open_api(&middleware.openapi)
        .with_state(state);

    api_routes
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
