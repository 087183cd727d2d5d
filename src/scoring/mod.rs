//! Scoring Module - artifact loading and fraud inference
//!
//! The artifact is loaded once at startup; the engine owns it afterwards and
//! shares it read-only across all in-flight requests.

pub mod artifact;
pub mod classifier;
pub mod engine;
pub mod threshold;

#[cfg(test)]
pub mod testing;

pub use engine::{PredictError, PredictionEngine};
