use axum::Json;
use resource_query::ResourceKind;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    kinds: Vec<ResourceKind>,
}

/// Health check endpoint
///
/// Liveness only: the CMS is not probed, so an upstream outage shows up as
/// 500s on the resource routes rather than as an unhealthy process.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        kinds: ResourceKind::ALL.to_vec(),
    })
}
