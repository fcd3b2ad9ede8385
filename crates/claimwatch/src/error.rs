use crate::bulk::BulkImportError;
use crate::config::ConfigError;
use crate::feedback::FeedbackError;
use crate::models::ArtifactError;
use crate::risk::{PredictionError, PredictionServiceError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Artifact(ArtifactError),
    Feedback(FeedbackError),
    Bulk(BulkImportError),
    Prediction(PredictionError),
    Payload(serde_json::Error),
    Io(std::io::Error),
    Server(axum::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Artifact(err) => write!(f, "model artifact error: {}", err),
            AppError::Feedback(err) => write!(f, "feedback error: {}", err),
            AppError::Bulk(err) => write!(f, "bulk import error: {}", err),
            AppError::Prediction(err) => write!(f, "prediction error: {}", err),
            AppError::Payload(err) => write!(f, "invalid JSON payload: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Feedback(err) => Some(err),
            AppError::Bulk(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Prediction(PredictionError::Input(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Prediction(PredictionError::Router(_))
            | AppError::Bulk(_)
            | AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Prediction(PredictionError::Scoring(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Artifact(_)
            | AppError::Feedback(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<FeedbackError> for AppError {
    fn from(value: FeedbackError) -> Self {
        Self::Feedback(value)
    }
}

impl From<BulkImportError> for AppError {
    fn from(value: BulkImportError) -> Self {
        Self::Bulk(value)
    }
}

impl From<PredictionError> for AppError {
    fn from(value: PredictionError) -> Self {
        Self::Prediction(value)
    }
}

impl From<PredictionServiceError> for AppError {
    fn from(value: PredictionServiceError) -> Self {
        match value {
            PredictionServiceError::Prediction(err) => Self::Prediction(err),
            PredictionServiceError::Bulk(err) => Self::Bulk(err),
            PredictionServiceError::Feedback(err) => Self::Feedback(err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}
