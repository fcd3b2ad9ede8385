use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{ClaimType, FeatureAttribution, KeywordScore};
use super::explanation::RiskTier;

/// Unified response envelope shared by every pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub fraud_type: ClaimType,
    pub fraud_probability: f64,
    pub trust_score: f64,
    pub is_anomalous: bool,
    pub risk_tier: RiskTier,
    pub persona_code: &'static str,
    pub fraud_persona: &'static str,
    pub summary: String,
    pub recommended_actions: Vec<String>,
    #[serde(flatten)]
    pub detail: PredictionDetail,
}

impl PredictionResult {
    /// Risk value the decision was taken on: fused risk for tabular claims,
    /// the classifier probability otherwise.
    pub fn decision_risk(&self) -> f64 {
        match &self.detail {
            PredictionDetail::Tabular(detail) => detail.fused_risk,
            PredictionDetail::Text(_) => self.fraud_probability,
        }
    }

    /// Display anomaly on the 0-10 scale.
    pub fn anomaly_score(&self) -> f64 {
        match &self.detail {
            PredictionDetail::Tabular(detail) => detail.anomaly_score,
            PredictionDetail::Text(detail) => detail.anomaly_score,
        }
    }
}

/// Pipeline-specific part of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionDetail {
    Tabular(TabularDetail),
    Text(TextDetail),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabularDetail {
    pub fused_risk: f64,
    pub normalized_anomaly: f64,
    pub anomaly_score: f64,
    pub top_features: Vec<FeatureAttribution>,
    pub raw_features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDetail {
    pub anomaly_score: f64,
    pub important_keywords: Vec<KeywordScore>,
    pub raw_features: BTreeMap<String, String>,
}
