//! Fraud risk scoring: fusion of model signals, persona rules, explanations, and routing of
//! each claim to the pipeline bound for its type.
//!
//! Models are reached only through the capability traits in [`adapter`], so any concrete
//! classifier or detector can be swapped in without touching the decision logic.

pub mod adapter;
pub mod domain;
pub mod explanation;
pub mod fusion;
pub mod http;
pub mod persona;
pub mod pipeline;
pub mod result;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use adapter::{
    AnomalyScorer, FeatureExplainer, FraudClassifier, ModelError, ScoringError, TabularAdapter,
    TextAdapter, TextClassifier, TextVectorizer,
};
pub use domain::{
    ClaimInput, ClaimType, FeatureAttribution, InputError, JobPostingText, KeywordScore,
    ScoreBounds, ScoringResult, TabularFeature, TabularFeatures,
};
pub use explanation::{assemble, Drivers, Explanation, RiskTier};
pub use fusion::{fuse, fuse_convex, fuse_logistic, normalize_anomaly, FusionMethod, FusionParams};
pub use http::prediction_router;
pub use persona::{InsurancePersona, JobPostingPersona, Persona, PersonaSignals};
pub use pipeline::{ClaimPipeline, InsurancePipeline, JobPostingPipeline};
pub use result::{PredictionDetail, PredictionResult, TabularDetail, TextDetail};
pub use router::{PredictionError, PredictionRouter, RouterError};
pub use service::{
    BulkOutcome, BulkPrediction, BulkRow, FeedbackReceipt, PredictionService,
    PredictionServiceError,
};
