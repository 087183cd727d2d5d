//! Fraud scoring handler

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::models::{PredictionResult, TransactionRecord};
use crate::{AppError, AppResult, AppState};

/// Score one transaction
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    // Not-ready wins over payload problems so clients know to retry later
    if !state.readiness.is_ready() {
        return Err(AppError::NotReady);
    }

    let Json(body) = payload?;
    let record = TransactionRecord::from_json(&body)?;

    let started = Instant::now();
    let result = state.engine.predict(&record)?;

    tracing::info!(
        event = "prediction_success",
        is_fraud = result.is_fraud,
        probability = result.fraud_probability,
        latency_us = started.elapsed().as_micros() as u64,
        "Prediction served"
    );

    Ok(Json(result))
}
