//! Fraud risk assessment for insurance claims and job postings.
//!
//! The [`risk`] module holds the scoring core: per-claim-type adapters over opaque
//! models, anomaly normalization and fusion, persona rules, and the explanation
//! templates, all wired together by [`risk::PredictionRouter`].

pub mod bulk;
pub mod config;
pub mod error;
pub mod feedback;
pub mod models;
pub mod risk;
pub mod telemetry;
