use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Claim scenarios the router knows how to wire a pipeline for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Insurance,
    JobFraud,
}

impl ClaimType {
    pub const fn tag(self) -> &'static str {
        match self {
            ClaimType::Insurance => "insurance",
            ClaimType::JobFraud => "job_fraud",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "insurance" => Some(Self::Insurance),
            "job_fraud" => Some(Self::JobFraud),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn default_fraud_type() -> String {
    ClaimType::Insurance.tag().to_string()
}

/// Claim record as received from the request boundary.
///
/// The tag is kept as raw text so an unknown scenario can be reported back by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    #[serde(default = "default_fraud_type")]
    pub fraud_type: String,
    #[serde(default)]
    pub claim_amount: Option<f64>,
    #[serde(default)]
    pub policy_tenure_days: Option<f64>,
    #[serde(default)]
    pub num_prior_claims: Option<f64>,
    #[serde(default)]
    pub customer_age: Option<f64>,
    #[serde(default)]
    pub job_text: Option<String>,
}

impl ClaimInput {
    pub fn insurance(
        claim_amount: f64,
        policy_tenure_days: f64,
        num_prior_claims: f64,
        customer_age: f64,
    ) -> Self {
        Self {
            fraud_type: ClaimType::Insurance.tag().to_string(),
            claim_amount: Some(claim_amount),
            policy_tenure_days: Some(policy_tenure_days),
            num_prior_claims: Some(num_prior_claims),
            customer_age: Some(customer_age),
            job_text: None,
        }
    }

    pub fn job_posting(text: impl Into<String>) -> Self {
        Self {
            fraud_type: ClaimType::JobFraud.tag().to_string(),
            claim_amount: None,
            policy_tenure_days: None,
            num_prior_claims: None,
            customer_age: None,
            job_text: Some(text.into()),
        }
    }

    /// Declared claim type tag, falling back to `insurance` when left blank.
    pub fn claim_tag(&self) -> &str {
        let tag = self.fraud_type.trim();
        if tag.is_empty() {
            ClaimType::Insurance.tag()
        } else {
            tag
        }
    }
}

/// Canonical tabular inputs for the insurance models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabularFeature {
    ClaimAmount,
    PolicyTenureDays,
    NumPriorClaims,
    CustomerAge,
}

impl TabularFeature {
    pub const ALL: [TabularFeature; 4] = [
        TabularFeature::ClaimAmount,
        TabularFeature::PolicyTenureDays,
        TabularFeature::NumPriorClaims,
        TabularFeature::CustomerAge,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            TabularFeature::ClaimAmount => "claim_amount",
            TabularFeature::PolicyTenureDays => "policy_tenure_days",
            TabularFeature::NumPriorClaims => "num_prior_claims",
            TabularFeature::CustomerAge => "customer_age",
        }
    }

    fn read(self, claim: &ClaimInput) -> Option<f64> {
        match self {
            TabularFeature::ClaimAmount => claim.claim_amount,
            TabularFeature::PolicyTenureDays => claim.policy_tenure_days,
            TabularFeature::NumPriorClaims => claim.num_prior_claims,
            TabularFeature::CustomerAge => claim.customer_age,
        }
    }
}

/// Validated numeric feature vector for a single insurance claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabularFeatures {
    pub claim_amount: f64,
    pub policy_tenure_days: f64,
    pub num_prior_claims: f64,
    pub customer_age: f64,
}

impl TabularFeatures {
    /// Extract the declared features, rejecting absent or non-finite values by name.
    pub fn from_claim(
        claim: &ClaimInput,
        declared: &[TabularFeature],
    ) -> Result<Self, InputError> {
        for feature in declared {
            match feature.read(claim) {
                None => return Err(InputError::MissingField { field: feature.name() }),
                Some(value) if !value.is_finite() => {
                    return Err(InputError::NonNumeric { field: feature.name() })
                }
                Some(_) => {}
            }
        }

        let value = |feature: TabularFeature| {
            feature
                .read(claim)
                .filter(|value| value.is_finite())
                .unwrap_or(0.0)
        };

        Ok(Self {
            claim_amount: value(TabularFeature::ClaimAmount),
            policy_tenure_days: value(TabularFeature::PolicyTenureDays),
            num_prior_claims: value(TabularFeature::NumPriorClaims),
            customer_age: value(TabularFeature::CustomerAge),
        })
    }

    pub fn get(&self, feature: TabularFeature) -> f64 {
        match feature {
            TabularFeature::ClaimAmount => self.claim_amount,
            TabularFeature::PolicyTenureDays => self.policy_tenure_days,
            TabularFeature::NumPriorClaims => self.num_prior_claims,
            TabularFeature::CustomerAge => self.customer_age,
        }
    }

    /// Model input row following the artifact's declared column order.
    pub fn row(&self, order: &[TabularFeature]) -> Vec<f64> {
        order.iter().map(|feature| self.get(*feature)).collect()
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        TabularFeature::ALL
            .into_iter()
            .map(|feature| (feature.name().to_string(), self.get(feature)))
            .collect()
    }
}

/// Trimmed, non-empty job posting text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPostingText(String);

impl JobPostingText {
    pub fn from_claim(claim: &ClaimInput) -> Result<Self, InputError> {
        let text = claim.job_text.as_deref().unwrap_or_default().trim();
        if text.is_empty() {
            return Err(InputError::MissingField { field: "job_text" });
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw anomaly score range observed on the training data.
///
/// `max` is the least anomalous extreme, `min` the most anomalous one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBounds {
    pub min: f64,
    pub max: f64,
}

impl ScoreBounds {
    pub const DEFAULT_MIN: f64 = -0.6;
    pub const DEFAULT_MAX: f64 = 0.2;

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl Default for ScoreBounds {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

/// Output of a scoring adapter for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringResult {
    pub fraud_probability: f64,
    pub raw_anomaly: Option<f64>,
}

/// Signed contribution of one tabular feature to the classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAttribution {
    pub feature: String,
    pub value: f64,
    pub shap_value: f64,
}

/// Weight of a vocabulary term within a single posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub keyword: String,
    pub score: f64,
}

/// Caller-side problems detected before any model is invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} is required for this claim type")]
    MissingField { field: &'static str },
    #[error("{field} must be a finite number")]
    NonNumeric { field: &'static str },
}

/// Coerce a model output into [0, 1], mapping non-finite values to 0.0.
pub(crate) fn unit_interval(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
