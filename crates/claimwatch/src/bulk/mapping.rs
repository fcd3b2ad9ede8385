use super::normalizer::normalize_header;
use crate::risk::TabularFeature;
use std::collections::HashMap;
use std::sync::OnceLock;

/// How a recognized source column feeds a canonical feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColumnMapping {
    pub(crate) feature: TabularFeature,
    pub(crate) scale: f64,
    /// Lower values win when several columns map onto the same feature.
    pub(crate) priority: u8,
}

static COLUMN_ALIAS_MAP: OnceLock<HashMap<String, ColumnMapping>> = OnceLock::new();

pub(crate) fn mapping_for_normalized(normalized_header: &str) -> Option<ColumnMapping> {
    column_alias_map().get(normalized_header).copied()
}

fn column_alias_map() -> &'static HashMap<String, ColumnMapping> {
    COLUMN_ALIAS_MAP.get_or_init(|| {
        use TabularFeature::*;

        const ALIASES: &[(&str, TabularFeature, f64)] = &[
            // Claim amount
            ("claim_amount", ClaimAmount, 1.0),
            ("total_claim_amount", ClaimAmount, 1.0),
            ("amount", ClaimAmount, 1.0),
            // Policy tenure
            ("policy_tenure_days", PolicyTenureDays, 1.0),
            ("tenure_days", PolicyTenureDays, 1.0),
            ("policy_tenure", PolicyTenureDays, 1.0),
            ("policy duration", PolicyTenureDays, 1.0),
            ("months_as_customer", PolicyTenureDays, 30.0),
            // Prior claims
            ("num_prior_claims", NumPriorClaims, 1.0),
            ("prior_claims", NumPriorClaims, 1.0),
            ("number_of_prior_claims", NumPriorClaims, 1.0),
            ("number_of_open_claims", NumPriorClaims, 1.0),
            // Customer age
            ("customer_age", CustomerAge, 1.0),
            ("age", CustomerAge, 1.0),
            ("policyholder_age", CustomerAge, 1.0),
        ];

        let mut map = HashMap::with_capacity(ALIASES.len());
        for (index, (name, feature, scale)) in ALIASES.iter().enumerate() {
            map.insert(
                normalize_header(name),
                ColumnMapping {
                    feature: *feature,
                    scale: *scale,
                    priority: index as u8,
                },
            );
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(header: &str) -> Option<ColumnMapping> {
    mapping_for_normalized(&normalize_header(header))
}
