use claimwatch::config::AppConfig;
use claimwatch::error::AppError;
use claimwatch::feedback::{CsvFeedbackLog, FeedbackError, FeedbackRecord, FeedbackSink};
use claimwatch::models::ModelArtifacts;
use claimwatch::risk::{PredictionRouter, PredictionService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Counts feedback without keeping payloads; used when no CSV log is configured.
pub(crate) struct InMemoryFeedbackSink {
    recorded: AtomicUsize,
    retrain_threshold: usize,
}

impl InMemoryFeedbackSink {
    pub(crate) fn new(retrain_threshold: usize) -> Self {
        Self {
            recorded: AtomicUsize::new(0),
            retrain_threshold,
        }
    }

    pub(crate) fn recorded(&self) -> usize {
        self.recorded.load(Ordering::Acquire)
    }
}

impl FeedbackSink for InMemoryFeedbackSink {
    fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        let total = self.recorded.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            fraud_type = record.fraud_type.tag(),
            total, "feedback counted in memory"
        );
        Ok(())
    }

    fn should_retrain(&self) -> Result<bool, FeedbackError> {
        Ok(self.recorded() >= self.retrain_threshold)
    }
}

/// Feedback destination selected from configuration.
pub(crate) enum FeedbackStore {
    Csv(CsvFeedbackLog),
    Memory(InMemoryFeedbackSink),
}

impl FeedbackSink for FeedbackStore {
    fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        match self {
            FeedbackStore::Csv(log) => log.record(record),
            FeedbackStore::Memory(sink) => sink.record(record),
        }
    }

    fn should_retrain(&self) -> Result<bool, FeedbackError> {
        match self {
            FeedbackStore::Csv(log) => log.should_retrain(),
            FeedbackStore::Memory(sink) => sink.should_retrain(),
        }
    }
}

fn load_artifacts(config: &AppConfig) -> Result<ModelArtifacts, AppError> {
    match &config.models.artifacts_path {
        Some(path) => {
            let artifacts = ModelArtifacts::from_path(path)?;
            info!(path = %path.display(), "model artifacts loaded");
            Ok(artifacts)
        }
        None => {
            info!("no model artifacts configured; using built-in demo bundle");
            Ok(ModelArtifacts::demo())
        }
    }
}

pub(crate) fn build_router(config: &AppConfig) -> Result<PredictionRouter, AppError> {
    let router = load_artifacts(config)?.into_router(config.fusion);
    let claim_types: Vec<&str> = router.claim_types().map(|claim_type| claim_type.tag()).collect();
    info!(
        ?claim_types,
        fusion = config.fusion.method.name(),
        alpha = config.fusion.alpha,
        "prediction router built"
    );
    Ok(router)
}

fn feedback_store(config: &AppConfig) -> FeedbackStore {
    let threshold = config.feedback.retrain_threshold;
    match &config.feedback.log_path {
        Some(path) => FeedbackStore::Csv(CsvFeedbackLog::new(path.clone(), threshold)),
        None => FeedbackStore::Memory(InMemoryFeedbackSink::new(threshold)),
    }
}

pub(crate) fn build_service(
    config: &AppConfig,
) -> Result<PredictionService<FeedbackStore>, AppError> {
    let router = build_router(config)?;
    Ok(PredictionService::new(
        Arc::new(router),
        Arc::new(feedback_store(config)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimwatch::feedback::Verdict;
    use claimwatch::risk::ClaimType;
    use serde_json::json;

    fn record() -> FeedbackRecord {
        FeedbackRecord {
            timestamp: "2025-11-02T10:00:00Z".to_string(),
            fraud_type: ClaimType::Insurance,
            predicted_label: "Needs Analyst Review".to_string(),
            predicted_probability: 0.55,
            user_feedback: Verdict::No,
            input_payload: json!({}),
        }
    }

    #[test]
    fn in_memory_sink_signals_retrain_at_threshold() {
        let sink = InMemoryFeedbackSink::new(2);
        sink.record(record()).expect("first");
        assert!(!sink.should_retrain().expect("readable"));
        sink.record(record()).expect("second");
        assert!(sink.should_retrain().expect("readable"));
        assert_eq!(sink.recorded(), 2);
    }

    #[test]
    fn in_memory_sink_keeps_a_count_not_the_payloads() {
        let sink = InMemoryFeedbackSink::new(usize::MAX);
        for _ in 0..1_000 {
            let mut big = record();
            big.input_payload = json!({ "job_text": "x".repeat(4_096) });
            sink.record(big).expect("recorded");
        }
        assert_eq!(sink.recorded(), 1_000);
        assert!(!sink.should_retrain().expect("readable"));
        assert_eq!(
            std::mem::size_of::<InMemoryFeedbackSink>(),
            std::mem::size_of::<AtomicUsize>() + std::mem::size_of::<usize>()
        );
    }

    #[test]
    fn store_delegates_to_memory_sink() {
        let store = FeedbackStore::Memory(InMemoryFeedbackSink::new(1));
        store.record(record()).expect("recorded");
        assert!(store.should_retrain().expect("readable"));
    }
}
