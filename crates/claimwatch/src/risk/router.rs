use std::collections::BTreeMap;

use tracing::info;

use super::adapter::ScoringError;
use super::domain::{ClaimInput, ClaimType, InputError};
use super::pipeline::ClaimPipeline;
use super::result::PredictionResult;

/// Dispatch table from claim type to its bound pipeline.
///
/// Built once from loaded model artifacts, then shared read-only by every request.
#[derive(Clone, Default)]
pub struct PredictionRouter {
    pipelines: BTreeMap<ClaimType, ClaimPipeline>,
}

impl PredictionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a pipeline under its claim type, replacing any earlier binding.
    pub fn with_pipeline(mut self, pipeline: impl Into<ClaimPipeline>) -> Self {
        let pipeline = pipeline.into();
        self.pipelines.insert(pipeline.claim_type(), pipeline);
        self
    }

    pub fn supports(&self, claim_type: ClaimType) -> bool {
        self.pipelines.contains_key(&claim_type)
    }

    pub fn claim_types(&self) -> impl Iterator<Item = ClaimType> + '_ {
        self.pipelines.keys().copied()
    }

    pub fn dispatch(&self, claim: &ClaimInput) -> Result<PredictionResult, PredictionError> {
        let tag = claim.claim_tag();
        let pipeline = ClaimType::from_tag(tag)
            .and_then(|claim_type| self.pipelines.get(&claim_type))
            .ok_or_else(|| RouterError::UnsupportedType {
                tag: tag.to_string(),
            })?;

        let result = pipeline.predict(claim)?;
        info!(
            fraud_type = %result.fraud_type,
            fraud_probability = result.fraud_probability,
            persona = result.persona_code,
            "prediction dispatched"
        );
        Ok(result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("unsupported fraud_type: {tag}")]
    UnsupportedType { tag: String },
}

/// Failure of a single prediction request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl PredictionError {
    /// Caller mistakes rejected before any model ran.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, PredictionError::Input(_) | PredictionError::Router(_))
    }
}
