//! Reference model artifacts implementing the scoring capability traits.
//!
//! Training happens elsewhere; this module only reads the fitted parameters back and binds
//! them into a [`PredictionRouter`].

mod tabular;
mod text;

pub use tabular::{LogisticClassifier, Standardizer, ZScoreAnomalyScorer};
pub use text::{LinearTextClassifier, TfidfVectorizer};

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::risk::{
    FusionParams, InsurancePipeline, JobPostingPipeline, PredictionRouter, ScoreBounds,
    TabularAdapter, TabularFeature, TextAdapter,
};

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[derive(Debug)]
pub enum ArtifactError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactError::Io(err) => write!(f, "failed to read model artifacts: {}", err),
            ArtifactError::Json(err) => write!(f, "invalid model artifact JSON: {}", err),
            ArtifactError::Invalid(detail) => write!(f, "inconsistent model artifacts: {}", detail),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArtifactError::Io(err) => Some(err),
            ArtifactError::Json(err) => Some(err),
            ArtifactError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ArtifactError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceArtifacts {
    pub feature_columns: Vec<TabularFeature>,
    pub classifier: LogisticClassifier,
    #[serde(default)]
    pub anomaly: Option<ZScoreAnomalyScorer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFraudArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearTextClassifier,
}

/// Fitted parameters for every supported claim type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub insurance: InsuranceArtifacts,
    #[serde(default)]
    pub job_fraud: Option<JobFraudArtifacts>,
}

impl ModelArtifacts {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        let artifacts: Self = serde_json::from_reader(reader)?;
        artifacts.validate()?;
        Ok(artifacts)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        let insurance = &self.insurance;
        if insurance.feature_columns.is_empty() {
            return Err(ArtifactError::Invalid(
                "insurance model declares no feature columns".to_string(),
            ));
        }

        insurance.classifier.validate().map_err(ArtifactError::Invalid)?;
        if insurance.classifier.coefficients.len() != insurance.feature_columns.len() {
            return Err(ArtifactError::Invalid(format!(
                "insurance classifier expects {} features but {} columns are declared",
                insurance.classifier.coefficients.len(),
                insurance.feature_columns.len()
            )));
        }

        if let Some(anomaly) = &insurance.anomaly {
            anomaly.validate().map_err(ArtifactError::Invalid)?;
            if anomaly.standardizer.len() != insurance.feature_columns.len() {
                return Err(ArtifactError::Invalid(
                    "anomaly scorer and classifier disagree on feature count".to_string(),
                ));
            }
        }

        if let Some(job) = &self.job_fraud {
            job.vectorizer.validate().map_err(ArtifactError::Invalid)?;
            if job.classifier.coefficients.len() != job.vectorizer.vocabulary.len() {
                return Err(ArtifactError::Invalid(
                    "job fraud classifier and vectorizer disagree on vocabulary size".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Bind the artifacts into per-claim-type pipelines.
    pub fn into_router(self, fusion: FusionParams) -> PredictionRouter {
        let InsuranceArtifacts {
            feature_columns,
            classifier,
            anomaly,
        } = self.insurance;

        let classifier = Arc::new(classifier);
        let mut adapter =
            TabularAdapter::new(feature_columns, classifier.clone()).with_explainer(classifier);
        if let Some(anomaly) = anomaly {
            adapter = adapter.with_anomaly(Arc::new(anomaly));
        }

        let mut router =
            PredictionRouter::new().with_pipeline(InsurancePipeline::new(adapter, fusion));

        if let Some(job) = self.job_fraud {
            let adapter = TextAdapter::new(Arc::new(job.vectorizer), Arc::new(job.classifier));
            router = router.with_pipeline(JobPostingPipeline::new(adapter));
        }

        router
    }

    /// Small hand-fitted bundle used when no artifact file is configured.
    pub fn demo() -> Self {
        let standardizer = Standardizer {
            means: vec![12_000.0, 900.0, 1.0, 45.0],
            scales: vec![9_000.0, 700.0, 1.2, 13.0],
        };

        let terms: &[(&str, f64, f64)] = &[
            ("wire transfer", 2.6, 2.4),
            ("upfront fee", 2.8, 2.6),
            ("no experience", 2.2, 1.6),
            ("from home", 2.0, 1.2),
            ("urgent", 1.8, 1.4),
            ("bitcoin", 2.9, 2.2),
            ("whatsapp", 2.5, 1.8),
            ("guaranteed", 2.1, 1.5),
            ("cash", 1.7, 1.0),
            ("fee", 1.6, 0.9),
            ("wire", 1.9, 0.8),
            ("benefits", 1.4, -1.2),
            ("interview", 1.3, -1.0),
            ("degree", 1.6, -1.1),
            ("team", 1.1, -0.6),
            ("salary", 1.2, -0.4),
            ("office", 1.3, -0.7),
            ("engineer", 1.5, -0.9),
        ];
        let vocabulary = terms.iter().map(|(term, _, _)| term.to_string()).collect();
        let idf = terms.iter().map(|(_, idf, _)| *idf).collect();
        let coefficients = terms.iter().map(|(_, _, weight)| *weight * 3.0).collect();

        Self {
            insurance: InsuranceArtifacts {
                feature_columns: TabularFeature::ALL.to_vec(),
                classifier: LogisticClassifier {
                    intercept: -1.2,
                    coefficients: vec![0.9, -0.8, 0.9, -0.1],
                    standardizer: standardizer.clone(),
                },
                anomaly: Some(ZScoreAnomalyScorer {
                    standardizer,
                    bounds: Some(ScoreBounds::new(-3.0, 0.0)),
                }),
            },
            job_fraud: Some(JobFraudArtifacts {
                vectorizer: TfidfVectorizer::new(vocabulary, idf),
                classifier: LinearTextClassifier {
                    intercept: -0.4,
                    coefficients,
                },
            }),
        }
    }
}
