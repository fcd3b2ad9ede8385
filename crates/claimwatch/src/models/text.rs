use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::sigmoid;
use crate::risk::{ModelError, TextClassifier, TextVectorizer};

/// TF-IDF over unigrams and bigrams with a fixed vocabulary, L2-normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f64>,
    #[serde(skip)]
    index: OnceLock<HashMap<String, usize>>,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: Vec<String>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            index: OnceLock::new(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vectorizer declares {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        Ok(())
    }

    fn index(&self) -> &HashMap<String, usize> {
        self.index.get_or_init(|| {
            self.vocabulary
                .iter()
                .enumerate()
                .map(|(position, term)| (term.to_ascii_lowercase(), position))
                .collect()
        })
    }
}

/// Lowercased alphanumeric tokens of at least two characters.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(|token| token.to_lowercase())
        .collect()
}

impl TextVectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<Vec<f64>, ModelError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(ModelError::new("vectorizer vocabulary and idf differ in length"));
        }

        let index = self.index();
        let tokens = tokenize(text);
        let mut weights = vec![0.0; self.vocabulary.len()];

        let unigrams = tokens.iter().cloned();
        let bigrams = tokens
            .windows(2)
            .map(|pair| format!("{} {}", pair[0], pair[1]));
        for term in unigrams.chain(bigrams) {
            if let Some(position) = index.get(&term) {
                weights[*position] += 1.0;
            }
        }

        for (weight, idf) in weights.iter_mut().zip(self.idf.iter()) {
            *weight *= idf;
        }

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for weight in &mut weights {
                *weight /= norm;
            }
        }

        Ok(weights)
    }

    fn feature_names(&self) -> &[String] {
        &self.vocabulary
    }
}

/// Logistic regression over a term-weight vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTextClassifier {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl TextClassifier for LinearTextClassifier {
    fn predict_proba(&self, weights: &[f64]) -> Result<f64, ModelError> {
        if weights.len() != self.coefficients.len() {
            return Err(ModelError::new(format!(
                "expected {} term weights, received {}",
                self.coefficients.len(),
                weights.len()
            )));
        }

        let logit = self.intercept
            + weights
                .iter()
                .zip(self.coefficients.iter())
                .map(|(weight, coefficient)| weight * coefficient)
                .sum::<f64>();
        Ok(sigmoid(logit))
    }
}
