use serde::{Deserialize, Serialize};

use super::domain::{FeatureAttribution, KeywordScore};

const DRIVER_SENTENCE_FEATURES: usize = 2;
const DRIVER_SENTENCE_KEYWORDS: usize = 3;

/// Coarse risk band shared by the summary and the action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub fn from_risk(risk: f64) -> Self {
        if risk >= 0.8 {
            Self::High
        } else if risk >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::High => "HIGH",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Low => "LOW",
        }
    }

    /// Fixed next steps for the tier; independent of the claim's features.
    pub fn actions(self) -> &'static [&'static str] {
        match self {
            RiskTier::High => &[
                "Escalate to manual investigation before approval.",
                "Verify customer identity and policy history.",
                "Request supporting documents (invoices, medical reports, police reports).",
            ],
            RiskTier::Medium => &[
                "Perform targeted checks on the highest-impact risk factors.",
                "Cross-check claim details against prior claim history.",
            ],
            RiskTier::Low => &[
                "Proceed with standard automated checks.",
                "Spot-audit a random sample of low-risk claims for quality control.",
            ],
        }
    }
}

/// Evidence backing the driver sentence of a summary.
#[derive(Debug, Clone, Copy)]
pub enum Drivers<'a> {
    Features(&'a [FeatureAttribution]),
    Keywords(&'a [KeywordScore]),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub tier: RiskTier,
    pub summary: String,
    pub actions: Vec<String>,
}

/// Deterministic summary for a scored claim.
pub fn assemble(risk: f64, display_anomaly: Option<f64>, drivers: Drivers<'_>) -> Explanation {
    let tier = RiskTier::from_risk(risk);
    let mut sentences = vec![format!(
        "Overall this is assessed as {} fraud risk (estimated fraud probability {:.2}).",
        tier.label(),
        risk
    )];

    if let Some(anomaly) = display_anomaly.filter(|value| *value > 0.0) {
        sentences.push(format!(
            "Anomaly score is {:.1}/10 (higher means more unusual behaviour).",
            anomaly
        ));
    }

    match drivers {
        Drivers::Features(features) if !features.is_empty() => {
            let parts: Vec<String> = features
                .iter()
                .take(DRIVER_SENTENCE_FEATURES)
                .map(|attribution| {
                    let direction = if attribution.shap_value > 0.0 {
                        "increases"
                    } else {
                        "reduces"
                    };
                    format!("{} {} risk", attribution.feature, direction)
                })
                .collect();
            sentences.push(format!("Key drivers include: {}.", parts.join(", ")));
        }
        Drivers::Keywords(keywords) if !keywords.is_empty() => {
            let terms: Vec<&str> = keywords
                .iter()
                .take(DRIVER_SENTENCE_KEYWORDS)
                .map(|keyword| keyword.keyword.as_str())
                .collect();
            sentences.push(format!("Most indicative terms: {}.", terms.join(", ")));
        }
        _ => {}
    }

    Explanation {
        tier,
        summary: sentences.join(" "),
        actions: tier.actions().iter().map(|action| action.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribution(feature: &str, shap_value: f64) -> FeatureAttribution {
        FeatureAttribution {
            feature: feature.to_string(),
            value: 1.0,
            shap_value,
        }
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(RiskTier::from_risk(0.8), RiskTier::High);
        assert_eq!(RiskTier::from_risk(0.79), RiskTier::Medium);
        assert_eq!(RiskTier::from_risk(0.4), RiskTier::Medium);
        assert_eq!(RiskTier::from_risk(0.39), RiskTier::Low);
    }

    #[test]
    fn summary_names_top_two_drivers_with_direction() {
        let features = vec![
            attribution("claim_amount", 0.31),
            attribution("policy_tenure_days", -0.12),
            attribution("customer_age", 0.05),
        ];

        let explanation = assemble(0.705, Some(9.0), Drivers::Features(&features));

        assert_eq!(
            explanation.summary,
            "Overall this is assessed as MEDIUM fraud risk (estimated fraud probability 0.70). \
Anomaly score is 9.0/10 (higher means more unusual behaviour). \
Key drivers include: claim_amount increases risk, policy_tenure_days reduces risk."
        );
        assert!(!explanation.summary.contains("customer_age"));
        assert_eq!(explanation.actions.len(), 2);
    }

    #[test]
    fn zero_anomaly_and_empty_drivers_are_omitted() {
        let explanation = assemble(0.1, Some(0.0), Drivers::None);
        assert_eq!(
            explanation.summary,
            "Overall this is assessed as LOW fraud risk (estimated fraud probability 0.10)."
        );
        assert_eq!(
            explanation.actions,
            vec![
                "Proceed with standard automated checks.".to_string(),
                "Spot-audit a random sample of low-risk claims for quality control.".to_string(),
            ]
        );
    }

    #[test]
    fn keyword_drivers_list_top_terms() {
        let keywords: Vec<KeywordScore> = ["wire", "fee", "urgent", "remote"]
            .iter()
            .enumerate()
            .map(|(index, keyword)| KeywordScore {
                keyword: keyword.to_string(),
                score: 1.0 - index as f64 * 0.1,
            })
            .collect();

        let explanation = assemble(0.85, Some(8.5), Drivers::Keywords(&keywords));

        assert_eq!(explanation.tier, RiskTier::High);
        assert!(explanation
            .summary
            .ends_with("Most indicative terms: wire, fee, urgent."));
        assert_eq!(
            explanation.actions[0],
            "Escalate to manual investigation before approval."
        );
    }
}
