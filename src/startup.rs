//! Startup sequence: load the artifact once and flip readiness.

use std::path::PathBuf;
use std::sync::Arc;

use crate::scoring::{artifact, PredictionEngine};

/// Runs once per process. A failure leaves the service alive but never ready;
/// there is no retry.
pub async fn load_model(engine: Arc<PredictionEngine>, model_path: PathBuf) -> bool {
    tracing::info!(event = "startup_begin");
    tracing::info!(event = "loading_model", path = %model_path.display());

    let path = model_path.clone();
    let loaded = match tokio::task::spawn_blocking(move || artifact::load(&path)).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(join_error) => Err(format!("model loader task failed: {}", join_error)),
    };

    let artifact = match loaded {
        Ok(artifact) => artifact,
        Err(error) => {
            tracing::error!(
                event = "startup_failure",
                path = %model_path.display(),
                error = %error,
                "Model could not be loaded; service will stay not ready"
            );
            return false;
        }
    };

    let features = artifact.feature_names.len();
    let input_width = artifact.classifier.n_features();
    let kind = artifact.classifier.kind();
    let sha256 = artifact.sha256.clone();

    if engine.install(artifact).is_err() {
        tracing::warn!(event = "startup_skipped", "A model is already installed; keeping it");
        return false;
    }

    tracing::info!(
        event = "startup_success",
        features,
        input_width,
        model_kind = kind,
        sha256 = %sha256,
        "Model loaded, service ready"
    );
    true
}
