use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::ClaimInput;
use super::router::PredictionError;
use super::service::{PredictionService, PredictionServiceError};
use crate::feedback::{FeedbackRequest, FeedbackSink};

/// Router builder exposing the prediction and feedback endpoints.
pub fn prediction_router<F>(service: Arc<PredictionService<F>>) -> Router
where
    F: FeedbackSink + 'static,
{
    Router::new()
        .route("/api/v1/predict", post(predict_handler::<F>))
        .route("/api/v1/predict/bulk", post(bulk_handler::<F>))
        .route("/api/v1/feedback", post(feedback_handler::<F>))
        .with_state(service)
}

pub(crate) async fn predict_handler<F>(
    State(service): State<Arc<PredictionService<F>>>,
    axum::Json(claim): axum::Json<ClaimInput>,
) -> Response
where
    F: FeedbackSink + 'static,
{
    match service.predict(&claim) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_handler<F>(
    State(service): State<Arc<PredictionService<F>>>,
    body: String,
) -> Response
where
    F: FeedbackSink + 'static,
{
    match service.predict_bulk(body.as_bytes()) {
        Ok(batch) => (StatusCode::OK, axum::Json(batch)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn feedback_handler<F>(
    State(service): State<Arc<PredictionService<F>>>,
    axum::Json(request): axum::Json<FeedbackRequest>,
) -> Response
where
    F: FeedbackSink + 'static,
{
    match service.submit_feedback(request) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(err) => error_response(err),
    }
}

fn status_for(err: &PredictionServiceError) -> StatusCode {
    match err {
        PredictionServiceError::Prediction(PredictionError::Input(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PredictionServiceError::Prediction(PredictionError::Router(_)) => StatusCode::BAD_REQUEST,
        PredictionServiceError::Bulk(_) => StatusCode::BAD_REQUEST,
        PredictionServiceError::Prediction(PredictionError::Scoring(_))
        | PredictionServiceError::Feedback(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: PredictionServiceError) -> Response {
    let status = status_for(&err);
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
