//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, resources_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
}

/// Router options that come from configuration rather than from the sources.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Empty allows any origin.
    pub allowed_origins: Vec<String>,
    /// Requests per second per client IP on the resource routes.
    pub rate_limit_per_second: Option<u64>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Build the Axum application router
///
/// Rate limiting keys on the peer address, so the router must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` when it is enabled.
pub fn build_app(deps: ServerDeps, options: AppOptions) -> Router {
    let app_state = AxumAppState {
        deps: Arc::new(deps),
    };

    let mut api = Router::new().route("/api/resources/:kind", post(resources_handler));

    if let Some(per_second) = options.rate_limit_per_second {
        // One request replenished every `1000 / n` ms, bursts up to 2n
        let rate_limit_config = GovernorConfigBuilder::default()
            .per_millisecond((1000 / per_second.max(1)).max(1))
            .burst_size(u32::try_from(per_second.saturating_mul(2)).unwrap_or(u32::MAX))
            .use_headers()
            .finish();

        match rate_limit_config {
            Some(config) => {
                api = api.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => tracing::warn!(per_second, "Invalid rate limit, serving without one"),
        }
    }

    api.route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
}
