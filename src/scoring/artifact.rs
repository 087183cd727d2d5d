//! Artifact loader
//!
//! Reads the JSON export written by the training pipeline and turns it into a
//! ready-to-score classifier plus the ordered feature names it was fitted on.

use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::classifier::{Classifier, ModelSpec};

/// Artifact layout version this service understands
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Class labels the positive-class-at-index-1 convention relies on
const EXPECTED_CLASSES: [i64; 2] = [0, 1];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model not found at {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read model at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model at {} is not a valid artifact: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact does not declare the feature names it was trained on")]
    MissingFeatureNames,

    #[error("invalid model: {0}")]
    InvalidModel(String),
}

#[derive(Debug, Deserialize)]
struct ArtifactFile {
    format_version: u32,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
    classes: Vec<i64>,
    model: ModelSpec,
}

/// A loaded classifier and its training-time feature schema. Immutable once built.
pub struct LoadedArtifact {
    pub classifier: Box<dyn Classifier>,
    /// Feature names in the exact column order the classifier expects
    pub feature_names: Vec<String>,
    pub sha256: String,
    pub path: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl fmt::Debug for LoadedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedArtifact")
            .field("kind", &self.classifier.kind())
            .field("feature_names", &self.feature_names)
            .field("sha256", &self.sha256)
            .field("path", &self.path)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

impl LoadedArtifact {
    /// Wrap an in-memory classifier, bypassing the file format.
    pub fn from_parts(classifier: Box<dyn Classifier>, feature_names: Vec<String>) -> Self {
        Self {
            classifier,
            feature_names,
            sha256: String::new(),
            path: PathBuf::from("<memory>"),
            loaded_at: Utc::now(),
        }
    }
}

/// Load an artifact from disk
pub fn load(path: &Path) -> Result<LoadedArtifact, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound { path: path.to_path_buf() },
        _ => LoadError::Io { path: path.to_path_buf(), source },
    })?;

    from_bytes(&bytes, path)
}

/// Parse an artifact already read into memory; `path` is recorded for reporting only.
pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<LoadedArtifact, LoadError> {
    let file: ArtifactFile = serde_json::from_slice(bytes).map_err(|source| LoadError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;

    if file.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(LoadError::InvalidModel(format!(
            "unsupported format_version {} (expected {})",
            file.format_version, ARTIFACT_FORMAT_VERSION
        )));
    }

    let feature_names = file
        .feature_names_in
        .filter(|names| !names.is_empty())
        .ok_or(LoadError::MissingFeatureNames)?;

    let mut seen = HashSet::with_capacity(feature_names.len());
    if let Some(duplicate) = feature_names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(LoadError::InvalidModel(format!(
            "feature name {:?} appears more than once",
            duplicate
        )));
    }

    if file.classes != EXPECTED_CLASSES {
        return Err(LoadError::InvalidModel(format!(
            "expected classes {:?}, artifact declares {:?}",
            EXPECTED_CLASSES, file.classes
        )));
    }

    let classifier = file
        .model
        .build(feature_names.len())
        .map_err(LoadError::InvalidModel)?;

    Ok(LoadedArtifact {
        classifier,
        feature_names,
        sha256: hex::encode(Sha256::digest(bytes)),
        path: path.to_path_buf(),
        loaded_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn tree_artifact() -> serde_json::Value {
        json!({
            "format_version": 1,
            "feature_names_in": ["V14", "Amount"],
            "classes": [0, 1],
            "model": {
                "kind": "decision_tree",
                "children_left": [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature": [0, -2, -2],
                "threshold": [-2.5, -2.0, -2.0],
                "value": [[50.0, 50.0], [5.0, 45.0], [45.0, 5.0]]
            }
        })
    }

    fn write(dir: &Path, value: &serde_json::Value) -> PathBuf {
        let path = dir.join("model.json");
        std::fs::write(&path, serde_json::to_vec(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_load_decision_tree() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), &tree_artifact());

        let artifact = load(&path).unwrap();
        assert_eq!(artifact.feature_names, vec!["V14", "Amount"]);
        assert_eq!(artifact.classifier.kind(), "decision_tree");
        assert_eq!(artifact.classifier.n_features(), 2);
        assert_eq!(artifact.path, path);
        assert_eq!(artifact.sha256.len(), 64);

        let [_, fraud] = artifact.classifier.predict_proba(&[-5.0, 10.0]).unwrap();
        assert_eq!(fraud, 0.9);
    }

    #[test]
    fn test_checksum_matches_file_contents() {
        let bytes = serde_json::to_vec(&tree_artifact()).unwrap();
        let artifact = from_bytes(&bytes, Path::new("model.json")).unwrap();
        assert_eq!(artifact.sha256, hex::encode(Sha256::digest(&bytes)));
    }

    #[test]
    fn test_missing_file_is_distinct_from_corrupt() {
        let dir = tempdir().unwrap();

        let missing = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, LoadError::NotFound { .. }));
        assert!(missing.to_string().starts_with("Model not found at"));

        let path = dir.path().join("model.json");
        std::fs::write(&path, b"\x80\x04\x95 not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::Corrupt { .. }));
    }

    #[test]
    fn test_missing_or_empty_feature_names() {
        let mut artifact = tree_artifact();
        artifact.as_object_mut().unwrap().remove("feature_names_in");
        let err = from_bytes(&serde_json::to_vec(&artifact).unwrap(), Path::new("m")).unwrap_err();
        assert!(matches!(err, LoadError::MissingFeatureNames));

        artifact["feature_names_in"] = json!([]);
        let err = from_bytes(&serde_json::to_vec(&artifact).unwrap(), Path::new("m")).unwrap_err();
        assert!(matches!(err, LoadError::MissingFeatureNames));
    }

    #[test]
    fn test_rejects_invalid_metadata() {
        let cases = [
            ("feature_names_in", json!(["V1", "V1"]), "more than once"),
            ("classes", json!([1, 0]), "expected classes"),
            ("format_version", json!(2), "unsupported format_version"),
        ];

        for (key, value, needle) in cases {
            let mut artifact = tree_artifact();
            artifact[key] = value;
            let err = from_bytes(&serde_json::to_vec(&artifact).unwrap(), Path::new("m")).unwrap_err();
            match err {
                LoadError::InvalidModel(message) => assert!(message.contains(needle), "{message}"),
                other => panic!("expected InvalidModel for {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_model_must_match_feature_count() {
        let mut artifact = tree_artifact();
        artifact["model"] = json!({
            "kind": "logistic_regression",
            "coef": [0.1, 0.2, 0.3],
            "intercept": 0.0
        });
        let err = from_bytes(&serde_json::to_vec(&artifact).unwrap(), Path::new("m")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidModel(_)));
    }
}
