use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::request::FieldError;

/// Which of the two predictors a request needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Heuristic,
    Ml,
}

/// Failures surfaced to API clients as `{"error": ...}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{}", unavailable_message(.0))]
    ModelUnavailable(ModelKind),

    #[error("{0}")]
    MalformedInput(#[from] FieldError),

    /// The predictor rejected otherwise well-formed input
    #[error("{0}")]
    Inference(String),

    /// A failed recommendation request, reported as a server error
    #[error("{0}")]
    RequestFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

fn unavailable_message(kind: &ModelKind) -> &'static str {
    match kind {
        ModelKind::Heuristic => "Server is not ready, model not loaded.",
        ModelKind::Ml => "ML model is not loaded.",
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable(_) | ApiError::RequestFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::MalformedInput(_) | ApiError::Inference(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Report bad input as a server error, keeping its message
    ///
    /// `/api/predict` answers every failure with 500.
    pub fn into_server_error(self) -> Self {
        match self {
            ApiError::MalformedInput(_) | ApiError::Inference(_) => {
                ApiError::RequestFailed(self.to_string())
            }
            other => other,
        }
    }
}

impl From<heuristic::PredictorError> for ApiError {
    fn from(err: heuristic::PredictorError) -> Self {
        use heuristic::PredictorError;
        match err {
            PredictorError::UnknownCategory { .. } | PredictorError::InvalidRank(_) => {
                ApiError::Inference(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ml_model::ModelError> for ApiError {
    fn from(err: ml_model::ModelError) -> Self {
        use ml_model::ModelError;
        match err {
            ModelError::UnknownLabel { .. } | ModelError::InvalidInput(_) => {
                ApiError::Inference(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(reason) => error!("Request failed: {}", reason),
            ApiError::RequestFailed(reason) => {
                warn!("Recommendation request rejected: {}", reason)
            }
            _ => {}
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_messages() {
        let heuristic = ApiError::ModelUnavailable(ModelKind::Heuristic);
        assert_eq!(heuristic.to_string(), "Server is not ready, model not loaded.");
        assert_eq!(heuristic.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let ml = ApiError::ModelUnavailable(ModelKind::Ml);
        assert_eq!(ml.to_string(), "ML model is not loaded.");
    }

    #[test]
    fn test_unknown_label_is_client_error() {
        let err = ApiError::from(ml_model::ModelError::UnknownLabel {
            feature: "category".to_string(),
            label: "XYZ".to_string(),
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("XYZ"));
    }

    #[test]
    fn test_model_io_failure_is_server_error() {
        let err = ApiError::from(ml_model::ModelError::InvalidArtifact("empty".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_server_error_keeps_message() {
        let err = ApiError::from(FieldError::Missing { field: "rank" }).into_server_error();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Missing required field 'rank'");

        let unready = ApiError::ModelUnavailable(ModelKind::Heuristic).into_server_error();
        assert!(matches!(unready, ApiError::ModelUnavailable(ModelKind::Heuristic)));
    }
}
