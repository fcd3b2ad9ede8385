mod insurance;
mod job_posting;

pub use insurance::InsurancePipeline;
pub use job_posting::JobPostingPipeline;

use super::domain::{ClaimInput, ClaimType};
use super::result::PredictionResult;
use super::router::PredictionError;

/// Fully bound scoring pipeline for one claim type.
#[derive(Clone)]
pub enum ClaimPipeline {
    Insurance(InsurancePipeline),
    JobPosting(JobPostingPipeline),
}

impl ClaimPipeline {
    pub const fn claim_type(&self) -> ClaimType {
        match self {
            ClaimPipeline::Insurance(_) => ClaimType::Insurance,
            ClaimPipeline::JobPosting(_) => ClaimType::JobFraud,
        }
    }

    pub fn predict(&self, claim: &ClaimInput) -> Result<PredictionResult, PredictionError> {
        match self {
            ClaimPipeline::Insurance(pipeline) => pipeline.predict(claim),
            ClaimPipeline::JobPosting(pipeline) => pipeline.predict(claim),
        }
    }
}

impl From<InsurancePipeline> for ClaimPipeline {
    fn from(pipeline: InsurancePipeline) -> Self {
        Self::Insurance(pipeline)
    }
}

impl From<JobPostingPipeline> for ClaimPipeline {
    fn from(pipeline: JobPostingPipeline) -> Self {
        Self::JobPosting(pipeline)
    }
}
