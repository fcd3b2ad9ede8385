use std::sync::Arc;

use super::domain::{
    unit_interval, FeatureAttribution, JobPostingText, KeywordScore, ScoreBounds, ScoringResult,
    TabularFeature, TabularFeatures,
};

/// Supervised model returning the probability of the fraud class for one row.
pub trait FraudClassifier: Send + Sync {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError>;
}

/// Unsupervised detector; higher raw scores mean more normal rows.
pub trait AnomalyScorer: Send + Sync {
    fn score(&self, row: &[f64]) -> Result<f64, ModelError>;

    /// Raw score range captured at training time, if the artifact recorded one.
    fn bounds(&self) -> Option<ScoreBounds> {
        None
    }
}

/// Per-feature signed contributions to the classifier output, aligned with the row.
pub trait FeatureExplainer: Send + Sync {
    fn contributions(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Maps free text onto weights over an ordered vocabulary.
pub trait TextVectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<Vec<f64>, ModelError>;
    fn feature_names(&self) -> &[String];
}

pub trait TextClassifier: Send + Sync {
    fn predict_proba(&self, weights: &[f64]) -> Result<f64, ModelError>;
}

/// Failure reported by an opaque model implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

impl ModelError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Identifies which model stage broke while scoring a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("fraud prediction failed: {0}")]
    Classifier(ModelError),
    #[error("anomaly scoring failed: {0}")]
    AnomalyScorer(ModelError),
    #[error("feature attribution failed: {0}")]
    Explainer(ModelError),
    #[error("text vectorization failed: {0}")]
    Vectorizer(ModelError),
}

/// Scoring adapter for the numeric insurance features.
#[derive(Clone)]
pub struct TabularAdapter {
    feature_columns: Vec<TabularFeature>,
    classifier: Arc<dyn FraudClassifier>,
    anomaly: Option<Arc<dyn AnomalyScorer>>,
    explainer: Option<Arc<dyn FeatureExplainer>>,
}

impl TabularAdapter {
    pub const TOP_ATTRIBUTIONS: usize = 5;

    pub fn new(feature_columns: Vec<TabularFeature>, classifier: Arc<dyn FraudClassifier>) -> Self {
        Self {
            feature_columns,
            classifier,
            anomaly: None,
            explainer: None,
        }
    }

    pub fn with_anomaly(mut self, anomaly: Arc<dyn AnomalyScorer>) -> Self {
        self.anomaly = Some(anomaly);
        self
    }

    pub fn with_explainer(mut self, explainer: Arc<dyn FeatureExplainer>) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn feature_columns(&self) -> &[TabularFeature] {
        &self.feature_columns
    }

    pub fn score_bounds(&self) -> Option<ScoreBounds> {
        self.anomaly.as_ref().and_then(|anomaly| anomaly.bounds())
    }

    pub fn score(&self, features: &TabularFeatures) -> Result<ScoringResult, ScoringError> {
        let row = features.row(&self.feature_columns);

        let fraud_probability = self
            .classifier
            .predict_proba(&row)
            .map(unit_interval)
            .map_err(ScoringError::Classifier)?;

        let raw_anomaly = match &self.anomaly {
            Some(anomaly) => Some(anomaly.score(&row).map_err(ScoringError::AnomalyScorer)?),
            None => None,
        };

        Ok(ScoringResult {
            fraud_probability,
            raw_anomaly,
        })
    }

    /// Top contributions ranked by magnitude; empty when no explainer is bound.
    pub fn attributions(
        &self,
        features: &TabularFeatures,
    ) -> Result<Vec<FeatureAttribution>, ScoringError> {
        let Some(explainer) = &self.explainer else {
            return Ok(Vec::new());
        };

        let row = features.row(&self.feature_columns);
        let contributions = explainer
            .contributions(&row)
            .map_err(ScoringError::Explainer)?;

        let mut ranked: Vec<FeatureAttribution> = self
            .feature_columns
            .iter()
            .zip(row.iter())
            .zip(contributions.iter())
            .map(|((feature, value), contribution)| FeatureAttribution {
                feature: feature.name().to_string(),
                value: *value,
                shap_value: if contribution.is_finite() {
                    *contribution
                } else {
                    0.0
                },
            })
            .collect();

        ranked.sort_by(|a, b| b.shap_value.abs().total_cmp(&a.shap_value.abs()));
        ranked.truncate(Self::TOP_ATTRIBUTIONS);
        Ok(ranked)
    }
}

/// Scoring adapter for free-text job postings. Has no anomaly signal.
#[derive(Clone)]
pub struct TextAdapter {
    vectorizer: Arc<dyn TextVectorizer>,
    classifier: Arc<dyn TextClassifier>,
}

impl TextAdapter {
    pub const TOP_KEYWORDS: usize = 10;

    pub fn new(vectorizer: Arc<dyn TextVectorizer>, classifier: Arc<dyn TextClassifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn score(&self, text: &JobPostingText) -> Result<ScoringResult, ScoringError> {
        let weights = self.vectorize(text)?;
        let fraud_probability = self
            .classifier
            .predict_proba(&weights)
            .map(unit_interval)
            .map_err(ScoringError::Classifier)?;

        Ok(ScoringResult {
            fraud_probability,
            raw_anomaly: None,
        })
    }

    /// Positive-weight terms of the posting, heaviest first; ties keep vocabulary order.
    pub fn keywords(
        &self,
        text: &JobPostingText,
        top_k: usize,
    ) -> Result<Vec<KeywordScore>, ScoringError> {
        let weights = self.vectorize(text)?;
        let names = self.vectorizer.feature_names();

        let mut ranked: Vec<(usize, f64)> = weights
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, weight)| *index < names.len() && weight.is_finite() && *weight > 0.0)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .map(|(index, score)| KeywordScore {
                keyword: names[index].clone(),
                score,
            })
            .collect())
    }

    fn vectorize(&self, text: &JobPostingText) -> Result<Vec<f64>, ScoringError> {
        self.vectorizer
            .transform(text.as_str())
            .map_err(ScoringError::Vectorizer)
    }
}
