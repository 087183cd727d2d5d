//! Service information

use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "Fraud Detection API";

#[derive(Serialize)]
pub struct Endpoints {
    health: &'static str,
    live: &'static str,
    ready: &'static str,
    predict: &'static str,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    status: &'static str,
    endpoints: Endpoints,
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
        endpoints: Endpoints {
            health: "/health",
            live: "/live",
            ready: "/ready",
            predict: "/predict",
        },
    })
}
