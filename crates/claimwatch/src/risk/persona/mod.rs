mod rules;

use serde::{Deserialize, Serialize};

pub(crate) use rules::INSURANCE_RULES;

/// Signals consulted by the insurance persona rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonaSignals {
    /// Fused risk in [0, 1].
    pub risk: f64,
    /// Anomaly rescaled to the 0-10 display range.
    pub display_anomaly: f64,
    pub claim_amount: f64,
    pub policy_tenure_days: f64,
    pub num_prior_claims: f64,
}

/// Investigative category for a tabular insurance claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsurancePersona {
    RepeatOffender,
    PolicyManipulation,
    OpportunisticHighValue,
    FinancialDistress,
    LowRiskNormal,
    NeedsReview,
}

impl InsurancePersona {
    pub const fn code(self) -> &'static str {
        match self {
            InsurancePersona::RepeatOffender => "repeat_offender",
            InsurancePersona::PolicyManipulation => "policy_manipulation",
            InsurancePersona::OpportunisticHighValue => "opportunistic_high_value",
            InsurancePersona::FinancialDistress => "financial_distress",
            InsurancePersona::LowRiskNormal => "low_risk_normal",
            InsurancePersona::NeedsReview => "needs_review",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            InsurancePersona::RepeatOffender => "Repeat Offender Pattern",
            InsurancePersona::PolicyManipulation => "Policy Manipulation Risk",
            InsurancePersona::OpportunisticHighValue => "Opportunistic High-Value Claim",
            InsurancePersona::FinancialDistress => "Financial Distress Pattern",
            InsurancePersona::LowRiskNormal => "Low Risk \u{2013} Normal Behavior",
            InsurancePersona::NeedsReview => "Needs Analyst Review",
        }
    }

    /// Evaluate the ordered rule list; the first matching rule wins.
    pub fn classify(signals: &PersonaSignals) -> Self {
        INSURANCE_RULES
            .iter()
            .find(|rule| (rule.matches)(signals))
            .map(|rule| rule.persona)
            .unwrap_or(InsurancePersona::NeedsReview)
    }
}

/// Three-tier persona for text-only postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostingPersona {
    High,
    Medium,
    Low,
}

impl JobPostingPersona {
    pub fn classify(fraud_probability: f64) -> Self {
        if fraud_probability >= 0.7 {
            Self::High
        } else if fraud_probability >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            JobPostingPersona::High => "high",
            JobPostingPersona::Medium => "medium",
            JobPostingPersona::Low => "low",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            JobPostingPersona::High => "High risk \u{2013} Likely fake posting",
            JobPostingPersona::Medium => "Medium risk \u{2013} Needs review",
            JobPostingPersona::Low => "Low risk \u{2013} Normal posting",
        }
    }
}

/// Persona attached to a prediction, one per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Insurance(InsurancePersona),
    JobPosting(JobPostingPersona),
}

impl Persona {
    pub const fn code(self) -> &'static str {
        match self {
            Persona::Insurance(persona) => persona.code(),
            Persona::JobPosting(persona) => persona.code(),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Persona::Insurance(persona) => persona.label(),
            Persona::JobPosting(persona) => persona.label(),
        }
    }
}
