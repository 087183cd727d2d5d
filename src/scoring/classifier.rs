//! Classifiers rebuilt from exported training artifacts
//!
//! The offline pipeline exports scikit-learn estimators as plain arrays.
//! Each supported estimator is checked once at load time so that scoring a
//! row never has to re-validate the structure.

use serde::Deserialize;
use thiserror::Error;

/// Probability output for a binary classifier: `[P(normal), P(fraud)]`.
pub type ClassProbabilities = [f64; 2];

/// Anything that can score a single, already ordered feature row.
pub trait Classifier: Send + Sync {
    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ClassifierError>;

    /// Row width the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Short estimator label used in logs
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("non-finite value at feature index {0}")]
    NonFiniteInput(usize),
}

fn check_row(row: &[f64], expected: usize) -> Result<(), ClassifierError> {
    if row.len() != expected {
        return Err(ClassifierError::ShapeMismatch { expected, actual: row.len() });
    }
    match row.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(ClassifierError::NonFiniteInput(index)),
        None => Ok(()),
    }
}

// ============================================================================
// ARTIFACT SPECS
// ============================================================================

/// Estimator section of the artifact, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    DecisionTree(TreeArrays),
    LogisticRegression(LinearCoefficients),
}

impl ModelSpec {
    /// Check the spec against the artifact's feature count and build the classifier.
    pub fn build(self, n_features: usize) -> Result<Box<dyn Classifier>, String> {
        match self {
            ModelSpec::DecisionTree(arrays) => {
                Ok(Box::new(DecisionTree::from_arrays(arrays, n_features)?))
            }
            ModelSpec::LogisticRegression(linear) => {
                Ok(Box::new(LogisticRegression::from_coefficients(linear, n_features)?))
            }
        }
    }
}

/// Parallel node arrays, as in scikit-learn's `tree_` attribute
#[derive(Debug, Clone, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (or fractions), one column per class
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearCoefficients {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

// ============================================================================
// DECISION TREE
// ============================================================================

const TREE_LEAF: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(ClassProbabilities),
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTree {
    pub fn from_arrays(arrays: TreeArrays, n_features: usize) -> Result<Self, String> {
        let count = arrays.children_left.len();
        if count == 0 {
            return Err("decision tree has no nodes".to_string());
        }
        let lengths = [
            arrays.children_right.len(),
            arrays.feature.len(),
            arrays.threshold.len(),
            arrays.value.len(),
        ];
        if lengths.iter().any(|&len| len != count) {
            return Err(format!(
                "decision tree arrays disagree on node count: {} vs {:?}",
                count, lengths
            ));
        }

        let mut nodes = Vec::with_capacity(count);
        for i in 0..count {
            let left = arrays.children_left[i];
            let right = arrays.children_right[i];

            if left == TREE_LEAF {
                if right != TREE_LEAF {
                    return Err(format!("node {} has only one child", i));
                }
                nodes.push(Node::Leaf(leaf_probabilities(i, &arrays.value[i])?));
                continue;
            }

            // Children are always stored after their parent, so walking down
            // from the root terminates.
            let child = |raw: i64| -> Result<usize, String> {
                usize::try_from(raw)
                    .ok()
                    .filter(|&c| c > i && c < count)
                    .ok_or_else(|| format!("node {} has invalid child index {}", i, raw))
            };
            let feature = usize::try_from(arrays.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| {
                    format!(
                        "node {} splits on feature {} but the model has {} features",
                        i, arrays.feature[i], n_features
                    )
                })?;
            let threshold = arrays.threshold[i];
            if !threshold.is_finite() {
                return Err(format!("node {} has a non-finite threshold", i));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes, n_features })
    }
}

fn leaf_probabilities(index: usize, value: &[f64]) -> Result<ClassProbabilities, String> {
    let [normal, fraud] = <[f64; 2]>::try_from(value)
        .map_err(|_| format!("leaf {} has {} class columns, expected 2", index, value.len()))?;
    if !(normal.is_finite() && fraud.is_finite()) || normal < 0.0 || fraud < 0.0 {
        return Err(format!("leaf {} has invalid class weights", index));
    }
    let total = normal + fraud;
    if total <= 0.0 {
        return Err(format!("leaf {} has no samples", index));
    }
    Ok([normal / total, fraud / total])
}

impl Classifier for DecisionTree {
    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ClassifierError> {
        check_row(row, self.n_features)?;

        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf(proba) => return Ok(*proba),
                Node::Split { feature, threshold, left, right } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "decision_tree"
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn from_coefficients(linear: LinearCoefficients, n_features: usize) -> Result<Self, String> {
        if linear.coef.len() != n_features {
            return Err(format!(
                "logistic regression has {} coefficients but the model has {} features",
                linear.coef.len(),
                n_features
            ));
        }
        if !linear.intercept.is_finite() || linear.coef.iter().any(|c| !c.is_finite()) {
            return Err("logistic regression has non-finite coefficients".to_string());
        }
        Ok(Self {
            coef: linear.coef,
            intercept: linear.intercept,
        })
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ClassifierError> {
        check_row(row, self.coef.len())?;

        let z = self.intercept + self.coef.iter().zip(row).map(|(c, x)| c * x).sum::<f64>();
        let fraud = sigmoid(z);
        Ok([1.0 - fraud, fraud])
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn kind(&self) -> &'static str {
        "logistic_regression"
    }
}
