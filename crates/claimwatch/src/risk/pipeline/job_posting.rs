use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::insurance::display_anomaly;
use crate::risk::adapter::TextAdapter;
use crate::risk::domain::{unit_interval, ClaimInput, ClaimType, JobPostingText};
use crate::risk::explanation::{self, Drivers};
use crate::risk::persona::{JobPostingPersona, Persona};
use crate::risk::result::{PredictionDetail, PredictionResult, TextDetail};
use crate::risk::router::PredictionError;

const ANOMALOUS_PROBABILITY: f64 = 0.5;

/// Text pipeline: the classifier probability is used directly as risk.
#[derive(Clone)]
pub struct JobPostingPipeline {
    adapter: TextAdapter,
}

impl JobPostingPipeline {
    pub fn new(adapter: TextAdapter) -> Self {
        Self { adapter }
    }

    pub fn predict(&self, claim: &ClaimInput) -> Result<PredictionResult, PredictionError> {
        let text = JobPostingText::from_claim(claim)?;

        let scoring = self.adapter.score(&text).inspect_err(|err| {
            warn!(error = %err, "job posting scoring failed");
        })?;
        let fraud_probability = unit_interval(scoring.fraud_probability);

        let important_keywords = self.adapter.keywords(&text, TextAdapter::TOP_KEYWORDS)?;
        let anomaly_score = display_anomaly(fraud_probability);
        let persona = JobPostingPersona::classify(fraud_probability);

        let explanation = explanation::assemble(
            fraud_probability,
            Some(anomaly_score),
            Drivers::Keywords(&important_keywords),
        );

        debug!(
            fraud_probability,
            persona = persona.code(),
            keywords = important_keywords.len(),
            "job posting scored"
        );

        let mut raw_features = BTreeMap::new();
        raw_features.insert("job_text".to_string(), text.as_str().to_string());

        let persona = Persona::JobPosting(persona);
        Ok(PredictionResult {
            fraud_type: ClaimType::JobFraud,
            fraud_probability,
            trust_score: unit_interval(1.0 - fraud_probability),
            is_anomalous: fraud_probability >= ANOMALOUS_PROBABILITY,
            risk_tier: explanation.tier,
            persona_code: persona.code(),
            fraud_persona: persona.label(),
            summary: explanation.summary,
            recommended_actions: explanation.actions,
            detail: PredictionDetail::Text(TextDetail {
                anomaly_score,
                important_keywords,
                raw_features,
            }),
        })
    }
}
