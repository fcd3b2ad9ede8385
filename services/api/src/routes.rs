use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use claimwatch::feedback::FeedbackSink;
use claimwatch::risk::{prediction_router, PredictionService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<F>(service: Arc<PredictionService<F>>) -> axum::Router
where
    F: FeedbackSink + 'static,
{
    prediction_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Acquire);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryFeedbackSink;
    use axum::body::Body;
    use axum::http::Request;
    use claimwatch::models::ModelArtifacts;
    use claimwatch::risk::FusionParams;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let router = ModelArtifacts::demo().into_router(FusionParams::default());
        let service = PredictionService::new(
            Arc::new(router),
            Arc::new(InMemoryFeedbackSink::new(100)),
        );
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        (
            with_service_routes(Arc::new(service)).layer(Extension(state)),
            readiness,
        )
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (app, _) = app(false);
        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (app, readiness) = app(false);
        let response = get(app.clone(), "/ready").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");

        readiness.store(true, Ordering::Release);
        let response = get(app, "/ready").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn metrics_render_as_prometheus_text() {
        let (app, _) = app(true);
        let response = get(app, "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn prediction_routes_are_mounted() {
        let (app, _) = app(true);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({ "fraud_type": "job_fraud", "job_text": "Pay a fee by wire" })
                            .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["fraud_type"], "job_fraud");
    }
}
