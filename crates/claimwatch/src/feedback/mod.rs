//! Analyst verdicts on past predictions, collected to decide when to retrain.

mod csv_log;

pub use csv_log::CsvFeedbackLog;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::ClaimType;

/// Default number of verdicts that triggers a retrain signal.
pub const DEFAULT_RETRAIN_THRESHOLD: usize = 100;

/// Analyst answer to "was this prediction correct?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Yes => "yes",
            Verdict::No => "no",
        }
    }
}

/// Verdict payload as submitted at the request boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub fraud_type: ClaimType,
    #[serde(default)]
    pub input_payload: serde_json::Value,
    pub predicted_label: String,
    pub predicted_probability: f64,
    pub user_feedback: Verdict,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Normalized row handed to a [`FeedbackSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub timestamp: String,
    pub fraud_type: ClaimType,
    pub predicted_label: String,
    pub predicted_probability: f64,
    pub user_feedback: Verdict,
    pub input_payload: serde_json::Value,
}

impl From<FeedbackRequest> for FeedbackRecord {
    fn from(request: FeedbackRequest) -> Self {
        let timestamp = request
            .timestamp
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

        let predicted_probability = if request.predicted_probability.is_finite() {
            request.predicted_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            timestamp,
            fraud_type: request.fraud_type,
            predicted_label: request.predicted_label,
            predicted_probability,
            user_feedback: request.user_feedback,
            input_payload: request.input_payload,
        }
    }
}

/// Destination for verdicts. How the retrain threshold is computed is up to the sink.
pub trait FeedbackSink: Send + Sync {
    fn record(&self, record: FeedbackRecord) -> Result<(), FeedbackError>;
    fn should_retrain(&self) -> Result<bool, FeedbackError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("failed to access feedback log: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feedback log data: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode feedback payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("feedback sink unavailable: {0}")]
    Unavailable(String),
}
