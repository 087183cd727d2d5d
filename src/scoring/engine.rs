//! Prediction engine
//!
//! Owns the loaded artifact for the life of the process. Every call checks
//! readiness first, re-projects the transaction into the artifact's feature
//! order, runs the classifier and applies the decision threshold.

use std::sync::{Arc, OnceLock};

use thiserror::Error;

use super::artifact::LoadedArtifact;
use super::classifier::ClassifierError;
use super::threshold;
use crate::models::{PredictionResult, TransactionRecord, REQUIRED_FIELDS};
use crate::state::ReadinessState;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Service not ready. Model not loaded.")]
    NotReady,

    #[error("model expects {expected} features but the request schema ({provided} fields) lacks {missing:?}")]
    FeatureMismatch {
        expected: usize,
        provided: usize,
        missing: Vec<String>,
    },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("classifier returned invalid fraud probability {0}")]
    InvalidOutput(f64),
}

pub struct PredictionEngine {
    readiness: Arc<ReadinessState>,
    artifact: OnceLock<LoadedArtifact>,
}

impl PredictionEngine {
    pub fn new(readiness: Arc<ReadinessState>) -> Self {
        Self {
            readiness,
            artifact: OnceLock::new(),
        }
    }

    /// Install the artifact and mark the service ready. Only the first
    /// install wins; a second one is handed back untouched.
    pub fn install(&self, artifact: LoadedArtifact) -> Result<(), LoadedArtifact> {
        self.artifact.set(artifact)?;
        self.readiness.set_ready(true);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.artifact.get().is_some()
    }

    pub fn predict(&self, record: &TransactionRecord) -> Result<PredictionResult, PredictError> {
        if !self.readiness.is_ready() {
            return Err(PredictError::NotReady);
        }
        let artifact = self.artifact.get().ok_or(PredictError::NotReady)?;

        let row = feature_vector(&artifact.feature_names, record)?;
        let [_, fraud_probability] = artifact.classifier.predict_proba(&row)?;

        if !threshold::is_valid_probability(fraud_probability) {
            return Err(PredictError::InvalidOutput(fraud_probability));
        }

        Ok(PredictionResult {
            is_fraud: u8::from(threshold::is_fraud(fraud_probability)),
            fraud_probability,
        })
    }
}

/// Order the record's values by the artifact's feature names. Record fields
/// the model was not trained on are dropped.
pub fn feature_vector(
    feature_names: &[String],
    record: &TransactionRecord,
) -> Result<Vec<f64>, PredictError> {
    let mut row = Vec::with_capacity(feature_names.len());
    let mut missing = Vec::new();

    for name in feature_names {
        match record.get(name) {
            Some(value) => row.push(value),
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(PredictError::FeatureMismatch {
            expected: feature_names.len(),
            provided: REQUIRED_FIELDS.len(),
            missing,
        });
    }

    Ok(row)
}
