// SPDX-FileCopyrightText: 2026 Blufio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use postsmith_core::PostsmithError;
use postsmith_core::traits::{PluginAdapter, SocialAdapter};
use postsmith_pipeline::PublishWorkflow;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthGuard, auth_middleware};
use crate::handlers;

/// Health state for the unauthenticated health/metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Prometheus render function. `None` when metrics are disabled.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
    /// Adapters reported by `/health`.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Generate-and-publish workflow.
    pub workflow: PublishWorkflow,
    /// Social adapter used for the profile lookup.
    pub social: Arc<dyn SocialAdapter>,
    /// Bearer-token guard for `/api/*`.
    pub auth: AuthGuard,
    /// Health state for unauthenticated endpoints.
    pub health: HealthState,
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&postsmith_config::model::ServerConfig> for ServerConfig {
    fn from(config: &postsmith_config::model::ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

/// Build the application router.
///
/// - GET /api/twitter/me, POST /api/twitter/post, POST /api/twitter/post-image (guarded)
/// - GET /health, GET /metrics (public)
pub fn router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/twitter/me", get(handlers::get_profile))
        .route("/api/twitter/post", post(handlers::post_text))
        .route("/api/twitter/post-image", post(handlers::post_image))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind to the configured host:port and serve until shutdown is signalled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), PostsmithError> {
    let auth_enabled = state.auth.is_enabled();
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PostsmithError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or(addr);
    tracing::info!(addr = %local, auth_enabled, "gateway server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PostsmithError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_model() {
        let model = postsmith_config::model::ServerConfig::default();
        let config = ServerConfig::from(&model);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }
}
