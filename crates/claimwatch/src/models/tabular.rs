use serde::{Deserialize, Serialize};

use super::sigmoid;
use crate::risk::{AnomalyScorer, FeatureExplainer, FraudClassifier, ModelError, ScoreBounds};

/// Feature standardization captured at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

impl Standardizer {
    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.means.len() {
            return Err(ModelError::new(format!(
                "expected {} features, received {}",
                self.means.len(),
                row.len()
            )));
        }

        Ok(row
            .iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(value, (mean, scale))| {
                let scale = if scale.abs() > f64::EPSILON { *scale } else { 1.0 };
                (value - mean) / scale
            })
            .collect())
    }
}

/// Logistic regression over standardized tabular features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub standardizer: Standardizer,
}

impl LogisticClassifier {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.coefficients.len() != self.standardizer.len()
            || self.standardizer.scales.len() != self.standardizer.len()
        {
            return Err(format!(
                "classifier declares {} coefficients for {} standardized features",
                self.coefficients.len(),
                self.standardizer.len()
            ));
        }
        Ok(())
    }

    fn logit_terms(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        let standardized = self.standardizer.transform(row)?;
        Ok(standardized
            .iter()
            .zip(self.coefficients.iter())
            .map(|(value, weight)| value * weight)
            .collect())
    }
}

impl FraudClassifier for LogisticClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, ModelError> {
        let logit = self.intercept + self.logit_terms(row)?.iter().sum::<f64>();
        Ok(sigmoid(logit))
    }
}

/// Exact attributions for a linear model in logit space, relative to the training mean.
impl FeatureExplainer for LogisticClassifier {
    fn contributions(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.logit_terms(row)
    }
}

/// Distance-from-training-mean detector; the raw score is the negated RMS z-score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreAnomalyScorer {
    pub standardizer: Standardizer,
    #[serde(default)]
    pub bounds: Option<ScoreBounds>,
}

impl ZScoreAnomalyScorer {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.standardizer.scales.len() != self.standardizer.len() {
            return Err("anomaly scorer means and scales differ in length".to_string());
        }
        if self.standardizer.is_empty() {
            return Err("anomaly scorer declares no features".to_string());
        }
        Ok(())
    }
}

impl AnomalyScorer for ZScoreAnomalyScorer {
    fn score(&self, row: &[f64]) -> Result<f64, ModelError> {
        let standardized = self.standardizer.transform(row)?;
        let mean_square =
            standardized.iter().map(|z| z * z).sum::<f64>() / standardized.len().max(1) as f64;
        Ok(-mean_square.sqrt())
    }

    fn bounds(&self) -> Option<ScoreBounds> {
        self.bounds
    }
}
