//! Prediction result model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// 0 = normal, 1 = fraud
    pub is_fraud: u8,
    /// Positive-class probability as returned by the classifier, unrounded
    pub fraud_probability: f64,
}
