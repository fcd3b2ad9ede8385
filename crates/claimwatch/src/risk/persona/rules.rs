use super::{InsurancePersona, PersonaSignals};

const HIGH_RISK: f64 = 0.8;
const ELEVATED_RISK: f64 = 0.4;
const STRONG_ANOMALY: f64 = 7.0;
const NEW_POLICY_DAYS: f64 = 60.0;
const HIGH_VALUE_AMOUNT: f64 = 25_000.0;
const ROUTINE_AMOUNT_CEILING: f64 = 20_000.0;

pub(crate) struct PersonaRule {
    pub(crate) persona: InsurancePersona,
    pub(crate) matches: fn(&PersonaSignals) -> bool,
}

/// Priority order matters: earlier rules shadow later ones.
pub(crate) static INSURANCE_RULES: &[PersonaRule] = &[
    PersonaRule {
        persona: InsurancePersona::RepeatOffender,
        matches: repeat_offender,
    },
    PersonaRule {
        persona: InsurancePersona::PolicyManipulation,
        matches: policy_manipulation,
    },
    PersonaRule {
        persona: InsurancePersona::OpportunisticHighValue,
        matches: opportunistic_high_value,
    },
    PersonaRule {
        persona: InsurancePersona::FinancialDistress,
        matches: financial_distress,
    },
    PersonaRule {
        persona: InsurancePersona::LowRiskNormal,
        matches: low_risk_normal,
    },
];

fn repeat_offender(signals: &PersonaSignals) -> bool {
    signals.risk >= HIGH_RISK && signals.num_prior_claims >= 3.0
}

fn policy_manipulation(signals: &PersonaSignals) -> bool {
    signals.risk >= ELEVATED_RISK
        && signals.policy_tenure_days < NEW_POLICY_DAYS
        && signals.num_prior_claims <= 1.0
}

fn opportunistic_high_value(signals: &PersonaSignals) -> bool {
    signals.risk >= ELEVATED_RISK && signals.claim_amount >= HIGH_VALUE_AMOUNT
}

fn financial_distress(signals: &PersonaSignals) -> bool {
    (ELEVATED_RISK..HIGH_RISK).contains(&signals.risk)
        && (signals.num_prior_claims >= 2.0 || signals.display_anomaly >= STRONG_ANOMALY)
}

fn low_risk_normal(signals: &PersonaSignals) -> bool {
    signals.risk < ELEVATED_RISK
        && signals.display_anomaly < STRONG_ANOMALY
        && signals.num_prior_claims <= 1.0
        && signals.claim_amount < ROUTINE_AMOUNT_CEILING
}
