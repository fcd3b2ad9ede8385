use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::feedback::{FeedbackError, FeedbackRecord, FeedbackSink};
use crate::risk::{
    AnomalyScorer, FeatureExplainer, FraudClassifier, FusionParams, InsurancePipeline,
    JobPostingPipeline, ModelError, PredictionRouter, PredictionService, ScoreBounds,
    TabularAdapter, TabularFeature, TextAdapter, TextClassifier, TextVectorizer,
};

/// Raw-score range under which a raw score of `-a` normalizes to `a`.
pub(super) const UNIT_BOUNDS: ScoreBounds = ScoreBounds::new(-1.0, 0.0);

pub(super) struct StubClassifier {
    probability: f64,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub(super) fn new(probability: f64) -> Arc<Self> {
        Arc::new(Self {
            probability,
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FraudClassifier for StubClassifier {
    fn predict_proba(&self, _row: &[f64]) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probability)
    }
}

impl TextClassifier for StubClassifier {
    fn predict_proba(&self, _weights: &[f64]) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.probability)
    }
}

pub(super) struct FailingClassifier;

impl FraudClassifier for FailingClassifier {
    fn predict_proba(&self, _row: &[f64]) -> Result<f64, ModelError> {
        Err(ModelError::new("model offline"))
    }
}

pub(super) struct StubAnomaly {
    pub(super) raw: f64,
    pub(super) bounds: Option<ScoreBounds>,
}

impl AnomalyScorer for StubAnomaly {
    fn score(&self, _row: &[f64]) -> Result<f64, ModelError> {
        Ok(self.raw)
    }

    fn bounds(&self) -> Option<ScoreBounds> {
        self.bounds
    }
}

pub(super) struct FailingAnomaly;

impl AnomalyScorer for FailingAnomaly {
    fn score(&self, _row: &[f64]) -> Result<f64, ModelError> {
        Err(ModelError::new("isolation forest unavailable"))
    }
}

/// Returns the same contribution vector for every row.
pub(super) struct StubExplainer(pub(super) Vec<f64>);

impl FeatureExplainer for StubExplainer {
    fn contributions(&self, _row: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingExplainer;

impl FeatureExplainer for FailingExplainer {
    fn contributions(&self, _row: &[f64]) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::new("explainer out of sync with model"))
    }
}

pub(super) struct StubVectorizer {
    names: Vec<String>,
    weights: Vec<f64>,
    calls: AtomicUsize,
}

impl StubVectorizer {
    pub(super) fn new(terms: &[(&str, f64)]) -> Arc<Self> {
        Arc::new(Self {
            names: terms.iter().map(|(name, _)| name.to_string()).collect(),
            weights: terms.iter().map(|(_, weight)| *weight).collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextVectorizer for StubVectorizer {
    fn transform(&self, _text: &str) -> Result<Vec<f64>, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.weights.clone())
    }

    fn feature_names(&self) -> &[String] {
        &self.names
    }
}

pub(super) struct FailingVectorizer {
    names: Vec<String>,
}

impl FailingVectorizer {
    pub(super) fn new() -> Arc<Self> {
        Arc::new(Self {
            names: vec!["upfront fee".to_string()],
        })
    }
}

impl TextVectorizer for FailingVectorizer {
    fn transform(&self, _text: &str) -> Result<Vec<f64>, ModelError> {
        Err(ModelError::new("vocabulary file missing"))
    }

    fn feature_names(&self) -> &[String] {
        &self.names
    }
}

pub(super) fn insurance_pipeline(
    classifier: Arc<dyn FraudClassifier>,
    anomaly: Option<StubAnomaly>,
) -> InsurancePipeline {
    let mut adapter = TabularAdapter::new(TabularFeature::ALL.to_vec(), classifier)
        .with_explainer(Arc::new(StubExplainer(vec![0.42, -0.18, 0.05, -0.01])));
    if let Some(anomaly) = anomaly {
        adapter = adapter.with_anomaly(Arc::new(anomaly));
    }
    InsurancePipeline::new(adapter, FusionParams::default())
}

pub(super) fn job_pipeline(
    vectorizer: Arc<dyn TextVectorizer>,
    classifier: Arc<dyn TextClassifier>,
) -> JobPostingPipeline {
    JobPostingPipeline::new(TextAdapter::new(vectorizer, classifier))
}

pub(super) fn scam_terms() -> Arc<StubVectorizer> {
    StubVectorizer::new(&[
        ("benefits", 0.0),
        ("upfront fee", 0.61),
        ("wire transfer", 0.52),
        ("urgent", 0.52),
        ("whatsapp", 0.2),
    ])
}

pub(super) fn full_router(insurance_probability: f64, job_probability: f64) -> PredictionRouter {
    PredictionRouter::new()
        .with_pipeline(insurance_pipeline(
            StubClassifier::new(insurance_probability),
            Some(StubAnomaly {
                raw: -0.5,
                bounds: Some(UNIT_BOUNDS),
            }),
        ))
        .with_pipeline(job_pipeline(
            scam_terms(),
            StubClassifier::new(job_probability),
        ))
}

#[derive(Default)]
pub(super) struct MemorySink {
    threshold: usize,
    records: Mutex<Vec<FeedbackRecord>>,
}

impl MemorySink {
    pub(super) fn with_threshold(threshold: usize) -> Self {
        Self {
            threshold,
            records: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn records(&self) -> Vec<FeedbackRecord> {
        self.records.lock().expect("sink mutex poisoned").clone()
    }
}

impl FeedbackSink for MemorySink {
    fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError> {
        self.records
            .lock()
            .expect("sink mutex poisoned")
            .push(record);
        Ok(())
    }

    fn should_retrain(&self) -> Result<bool, FeedbackError> {
        Ok(self.records.lock().expect("sink mutex poisoned").len() >= self.threshold)
    }
}

pub(super) struct OfflineSink;

impl FeedbackSink for OfflineSink {
    fn record(&self, _record: FeedbackRecord) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unavailable("disk full".to_string()))
    }

    fn should_retrain(&self) -> Result<bool, FeedbackError> {
        Ok(false)
    }
}

pub(super) fn build_service(
    threshold: usize,
) -> (PredictionService<MemorySink>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::with_threshold(threshold));
    let service = PredictionService::new(Arc::new(full_router(0.3, 0.82)), sink.clone());
    (service, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
