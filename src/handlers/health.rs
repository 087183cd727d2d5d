//! Health, liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
}

#[derive(Serialize)]
pub struct ProbeResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    model_loaded: bool,
}

pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Orchestrator liveness probe
pub async fn live(State(state): State<AppState>) -> (StatusCode, Json<ProbeResponse>) {
    if state.readiness.is_alive() {
        (StatusCode::OK, Json(ProbeResponse { status: "alive" }))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(ProbeResponse { status: "dead" }))
    }
}

/// Orchestrator readiness probe
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let model_loaded = state.engine.is_loaded();
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(ReadyResponse { status: "ready", model_loaded }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse { status: "not_ready", model_loaded }),
        )
    }
}
