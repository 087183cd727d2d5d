//! Fraud Detection API
//!
//! Online scoring service for a trained transaction classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     FRAUD DETECTION API                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────┐   ┌──────────────────────┐  │
//! │  │  Router   │──▶│  Validator  │──▶│  Prediction Engine   │  │
//! │  │  (Axum)   │   │ (30 fields) │   │ (artifact, threshold)│  │
//! │  └─────┬─────┘   └─────────────┘   └──────────▲───────────┘  │
//! │        │ probes                               │ once         │
//! │        ▼                                      │              │
//! │  ┌─────────────┐                     ┌────────┴─────────┐    │
//! │  │  Readiness  │◀────────────────────│  Startup loader  │    │
//! │  └─────────────┘                     └──────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod models;
mod scoring;
mod startup;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, LogFormat};
use scoring::PredictionEngine;
use state::ReadinessState;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(config.log_format);

    tracing::info!("Fraud Detection API starting...");
    tracing::info!(
        model_path = %config.model_path.display(),
        environment = %config.environment,
        production = config.is_production(),
        "Configuration loaded"
    );

    // Build application state; the model is not loaded yet
    let readiness = Arc::new(ReadinessState::new());
    let engine = Arc::new(PredictionEngine::new(readiness.clone()));
    let state = AppState {
        readiness,
        engine: engine.clone(),
    };

    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    // Probes are answered while the artifact loads
    tokio::spawn(startup::load_model(engine, config.model_path.clone()));

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fraud_scoring_api=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<ReadinessState>,
    pub engine: Arc<PredictionEngine>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::info::root))
        .route("/health", get(handlers::health::check))
        .route("/live", get(handlers::health::live))
        .route("/ready", get(handlers::health::ready))
        .route("/predict", post(handlers::predict::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
