//! Transaction record model

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Number of anonymized `V*` components in a transaction
pub const V_FIELD_COUNT: usize = 28;

/// Every field a scoring request must carry, in declaration order
pub const REQUIRED_FIELDS: [&str; V_FIELD_COUNT + 2] = [
    "Time",
    "V1", "V2", "V3", "V4", "V5", "V6", "V7",
    "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21",
    "V22", "V23", "V24", "V25", "V26", "V27", "V28",
    "Amount",
];

/// A validated transaction. Not yet ordered for any particular model.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Seconds elapsed since the first transaction in the dataset
    pub time: f64,
    pub v: [f64; V_FIELD_COUNT],
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    Missing,
    NotNumeric,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub issue: FieldIssue,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            FieldIssue::Missing => write!(f, "{}: field required", self.field),
            FieldIssue::NotNumeric => write!(f, "{}: value is not a valid number", self.field),
        }
    }
}

/// Client-side fault in a scoring request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("invalid transaction: {}", join_fields(.0))]
    InvalidFields(Vec<FieldError>),
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Names of the offending fields, empty for body-level errors
    pub fn fields(&self) -> Vec<&'static str> {
        match self {
            ValidationError::InvalidFields(errors) => errors.iter().map(|e| e.field).collect(),
            _ => Vec::new(),
        }
    }
}

impl TransactionRecord {
    /// Validate a parsed JSON body. Unknown keys are ignored; every issue in
    /// the body is reported, not just the first.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let mut values = [0.0f64; REQUIRED_FIELDS.len()];
        let mut errors = Vec::new();

        for (slot, field) in values.iter_mut().zip(REQUIRED_FIELDS) {
            match object.get(field) {
                None => errors.push(FieldError { field, issue: FieldIssue::Missing }),
                Some(value) => match value.as_f64() {
                    Some(number) if number.is_finite() => *slot = number,
                    _ => errors.push(FieldError { field, issue: FieldIssue::NotNumeric }),
                },
            }
        }

        if !errors.is_empty() {
            return Err(ValidationError::InvalidFields(errors));
        }

        let mut v = [0.0f64; V_FIELD_COUNT];
        v.copy_from_slice(&values[1..=V_FIELD_COUNT]);

        Ok(Self {
            time: values[0],
            v,
            amount: values[V_FIELD_COUNT + 1],
        })
    }

    /// Look up a field by its wire name (`Time`, `V1`..`V28`, `Amount`)
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "Time" => Some(self.time),
            "Amount" => Some(self.amount),
            _ => {
                let digits = name.strip_prefix('V')?;
                let canonical = !digits.is_empty()
                    && !digits.starts_with('0')
                    && digits.bytes().all(|b| b.is_ascii_digit());
                if !canonical {
                    return None;
                }
                let index: usize = digits.parse().ok()?;
                self.v.get(index.checked_sub(1)?).copied()
            }
        }
    }
}
