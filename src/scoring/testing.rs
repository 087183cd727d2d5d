//! Test doubles shared by the scoring and handler tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::classifier::{ClassProbabilities, Classifier, ClassifierError};
use crate::models::TransactionRecord;

/// Returns a fixed fraud probability and remembers every row it was given.
pub struct RecordingClassifier {
    fraud_probability: f64,
    n_features: usize,
    calls: Arc<AtomicUsize>,
    rows: Arc<Mutex<Vec<Vec<f64>>>>,
}

impl RecordingClassifier {
    pub fn new(fraud_probability: f64, n_features: usize) -> Self {
        Self {
            fraud_probability,
            n_features,
            calls: Arc::new(AtomicUsize::new(0)),
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn rows(&self) -> Arc<Mutex<Vec<Vec<f64>>>> {
        self.rows.clone()
    }
}

impl Classifier for RecordingClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(row.to_vec());
        if row.len() != self.n_features {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok([1.0 - self.fraud_probability, self.fraud_probability])
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "recording"
    }
}

/// The first transaction of the public credit-card dataset
pub fn sample_record() -> TransactionRecord {
    TransactionRecord {
        time: 0.0,
        v: [
            -1.3598, -0.0728, 2.5363, 1.3782, -0.3383, 0.4624, 0.2396, 0.0987,
            0.3638, 0.0908, -0.5516, -0.6178, -0.9914, -0.3112, 1.4681, -0.4704,
            0.2080, 0.0258, 0.4040, 0.2514, -0.0183, 0.2778, -0.1105, 0.0669,
            0.1286, -0.1891, 0.1336, -0.0211,
        ],
        amount: 149.62,
    }
}

/// `sample_record` as a request body
pub fn sample_body() -> serde_json::Value {
    let record = sample_record();
    let mut body = serde_json::Map::new();
    body.insert("Time".into(), record.time.into());
    for (i, value) in record.v.iter().enumerate() {
        body.insert(format!("V{}", i + 1), (*value).into());
    }
    body.insert("Amount".into(), record.amount.into());
    serde_json::Value::Object(body)
}
