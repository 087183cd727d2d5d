//! Fraud decision threshold

/// A transaction is flagged when `P(fraud)` is strictly above this value.
pub const DECISION_THRESHOLD: f64 = 0.5;

pub fn is_fraud(fraud_probability: f64) -> bool {
    fraud_probability > DECISION_THRESHOLD
}

pub fn is_valid_probability(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}
