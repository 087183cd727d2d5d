//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::ValidationError;
use crate::scoring::PredictError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Client errors
    Validation(ValidationError),

    // Service state
    NotReady,

    // Server faults
    Prediction(PredictError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Validation(err) => {
                tracing::debug!(event = "validation_error", fields = ?err.fields(), "{}", err);
                err.to_string()
            }
            AppError::NotReady => {
                tracing::warn!(
                    event = "prediction_rejected",
                    "Prediction requested before model was loaded"
                );
                PredictError::NotReady.to_string()
            }
            AppError::Prediction(err) => {
                match err {
                    PredictError::FeatureMismatch { expected, provided, missing } => {
                        tracing::error!(
                            event = "prediction_error",
                            expected_features = *expected,
                            provided_fields = *provided,
                            missing = ?missing,
                            error = %err,
                            "Artifact feature schema does not match request schema"
                        );
                    }
                    _ => tracing::error!(event = "prediction_error", error = %err, "Prediction failed"),
                }
                format!("Prediction failed: {}", err)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::NotReady => AppError::NotReady,
            other => AppError::Prediction(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::classifier::ClassifierError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::from(ValidationError::NotAnObject).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(PredictError::NotReady).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(PredictError::InvalidOutput(2.0)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(PredictError::Classifier(ClassifierError::NonFiniteInput(0))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(PredictError::FeatureMismatch {
                expected: 3,
                provided: 30,
                missing: vec!["Class".into()],
            })
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
