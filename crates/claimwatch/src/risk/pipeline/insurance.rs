use tracing::{debug, warn};

use crate::risk::adapter::TabularAdapter;
use crate::risk::domain::{unit_interval, ClaimInput, ClaimType, TabularFeatures};
use crate::risk::explanation::{self, Drivers};
use crate::risk::fusion::{normalize_anomaly, FusionParams};
use crate::risk::persona::{InsurancePersona, Persona, PersonaSignals};
use crate::risk::result::{PredictionDetail, PredictionResult, TabularDetail};
use crate::risk::router::PredictionError;

const ANOMALOUS_RISK: f64 = 0.5;

/// Tabular pipeline: classifier and anomaly detector fused into one risk value.
#[derive(Clone)]
pub struct InsurancePipeline {
    adapter: TabularAdapter,
    fusion: FusionParams,
}

impl InsurancePipeline {
    pub fn new(adapter: TabularAdapter, fusion: FusionParams) -> Self {
        Self { adapter, fusion }
    }

    pub fn predict(&self, claim: &ClaimInput) -> Result<PredictionResult, PredictionError> {
        let features = TabularFeatures::from_claim(claim, self.adapter.feature_columns())?;

        let scoring = self.adapter.score(&features).inspect_err(|err| {
            warn!(error = %err, "insurance scoring failed");
        })?;
        let fraud_probability = scoring.fraud_probability;

        let (fused_risk, normalized_anomaly) = match scoring.raw_anomaly {
            Some(raw) => {
                if !raw.is_finite() {
                    debug!(raw, "non-finite raw anomaly score treated as neutral");
                }
                let normalized = normalize_anomaly(raw, self.adapter.score_bounds());
                (self.fusion.fuse(fraud_probability, normalized), normalized)
            }
            None => (fraud_probability, 0.0),
        };
        let fused_risk = unit_interval(fused_risk);
        let anomaly_score = display_anomaly(normalized_anomaly);

        let top_features = self.adapter.attributions(&features)?;

        let persona = InsurancePersona::classify(&PersonaSignals {
            risk: fused_risk,
            display_anomaly: anomaly_score,
            claim_amount: features.claim_amount,
            policy_tenure_days: features.policy_tenure_days,
            num_prior_claims: features.num_prior_claims,
        });

        let explanation = explanation::assemble(
            fused_risk,
            Some(anomaly_score),
            Drivers::Features(&top_features),
        );

        debug!(
            fraud_probability,
            fused_risk,
            persona = persona.code(),
            "insurance claim scored"
        );

        let persona = Persona::Insurance(persona);
        Ok(PredictionResult {
            fraud_type: ClaimType::Insurance,
            fraud_probability,
            trust_score: unit_interval(1.0 - fused_risk),
            is_anomalous: fused_risk >= ANOMALOUS_RISK,
            risk_tier: explanation.tier,
            persona_code: persona.code(),
            fraud_persona: persona.label(),
            summary: explanation.summary,
            recommended_actions: explanation.actions,
            detail: PredictionDetail::Tabular(TabularDetail {
                fused_risk,
                normalized_anomaly,
                anomaly_score,
                top_features,
                raw_features: features.to_map(),
            }),
        })
    }
}

/// Rescale a normalized anomaly onto the 0-10 display range, two decimals.
pub(crate) fn display_anomaly(normalized: f64) -> f64 {
    let scaled = (unit_interval(normalized) * 10.0 * 100.0).round() / 100.0;
    scaled.clamp(0.0, 10.0)
}
