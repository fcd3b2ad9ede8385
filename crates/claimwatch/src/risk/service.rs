use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ClaimInput, TabularFeature};
use super::result::PredictionResult;
use super::router::{PredictionError, PredictionRouter};
use crate::bulk::{BulkClaimImporter, BulkImportError};
use crate::feedback::{FeedbackError, FeedbackRecord, FeedbackRequest, FeedbackSink};

/// Service composing the prediction router with the feedback sink.
pub struct PredictionService<F> {
    router: Arc<PredictionRouter>,
    feedback: Arc<F>,
}

/// Outcome of one row of a bulk request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkOutcome {
    Scored { prediction: PredictionResult },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkRow {
    /// 1-based data row, excluding the header.
    pub row: usize,
    #[serde(flatten)]
    pub outcome: BulkOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkPrediction {
    pub rows: Vec<BulkRow>,
    pub missing_features: Vec<TabularFeature>,
}

impl BulkPrediction {
    pub fn scored(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.outcome, BulkOutcome::Scored { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackReceipt {
    pub status: &'static str,
    pub retrain_triggered: bool,
}

impl<F> PredictionService<F>
where
    F: FeedbackSink + 'static,
{
    pub fn new(router: Arc<PredictionRouter>, feedback: Arc<F>) -> Self {
        Self { router, feedback }
    }

    pub fn router(&self) -> &PredictionRouter {
        &self.router
    }

    pub fn predict(&self, claim: &ClaimInput) -> Result<PredictionResult, PredictionServiceError> {
        Ok(self.router.dispatch(claim)?)
    }

    /// Score every row of a claims CSV. A failing row is reported in place and does not
    /// abort the batch.
    pub fn predict_bulk<R: Read>(
        &self,
        reader: R,
    ) -> Result<BulkPrediction, PredictionServiceError> {
        let import = BulkClaimImporter::from_reader(reader)?;
        if !import.missing_features.is_empty() {
            warn!(
                missing = ?import.missing_features,
                "bulk claims file lacks columns; values zero-filled"
            );
        }

        let rows: Vec<BulkRow> = import
            .claims
            .iter()
            .enumerate()
            .map(|(index, claim)| {
                let outcome = match self.router.dispatch(claim) {
                    Ok(prediction) => BulkOutcome::Scored { prediction },
                    Err(err) => BulkOutcome::Failed {
                        error: err.to_string(),
                    },
                };
                BulkRow {
                    row: index + 1,
                    outcome,
                }
            })
            .collect();

        let batch = BulkPrediction {
            rows,
            missing_features: import.missing_features,
        };
        info!(
            rows = batch.rows.len(),
            scored = batch.scored(),
            "bulk prediction completed"
        );
        Ok(batch)
    }

    pub fn submit_feedback(
        &self,
        request: FeedbackRequest,
    ) -> Result<FeedbackReceipt, PredictionServiceError> {
        let record = FeedbackRecord::from(request);
        let fraud_type = record.fraud_type;
        self.feedback.record(record)?;

        let retrain_triggered = self.feedback.should_retrain()?;
        if retrain_triggered {
            info!(%fraud_type, "feedback volume reached retrain threshold");
        }

        Ok(FeedbackReceipt {
            status: "ok",
            retrain_triggered,
        })
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error(transparent)]
    Bulk(#[from] BulkImportError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}
