// handlers/health.rs - GET /health and GET / handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// UP (200) only when the runtime has started and every check passes,
/// otherwise DOWN (503) with the same detail fields
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.health.report().await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(report))
}

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Tenant Cache API",
        "version": version,
        "description": "Multi-tenant REST facade over per-tenant cache connections",
        "endpoints": {
            "tenants": "/tenants[/:id] (tenant directory)",
            "users": "/users[/:id] (requires 'tenant' header)",
            "health": "/health",
        }
    }))
}
