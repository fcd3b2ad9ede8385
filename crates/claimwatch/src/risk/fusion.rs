use serde::{Deserialize, Serialize};

use super::domain::{unit_interval, ScoreBounds};

const BOUNDS_EPSILON: f64 = 1e-6;

/// Exponent magnitude past which the sigmoid is pinned to 0 or 1.
const SIGMOID_SATURATION: f64 = 700.0;

/// Strategy used to blend the supervised and anomaly signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    #[default]
    Convex,
    Logistic,
}

impl FusionMethod {
    /// Unknown names resolve to [`FusionMethod::Convex`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "logistic" => Self::Logistic,
            _ => Self::Convex,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FusionMethod::Convex => "convex",
            FusionMethod::Logistic => "logistic",
        }
    }
}

/// Fixed, untrained fusion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionParams {
    pub method: FusionMethod,
    /// Weight placed on the supervised probability by the convex blend.
    pub alpha: f64,
    pub beta0: f64,
    pub beta1: f64,
    pub beta2: f64,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            method: FusionMethod::Convex,
            alpha: 0.65,
            beta0: -2.0,
            beta1: 2.0,
            beta2: 2.0,
        }
    }
}

impl FusionParams {
    pub fn fuse(&self, fraud_probability: f64, normalized_anomaly: f64) -> f64 {
        fuse(fraud_probability, normalized_anomaly, self)
    }
}

/// Rescale a raw anomaly score into [0, 1] where 1 is the most anomalous.
///
/// Higher raw scores are more normal, so `bounds.max` maps to 0 and `bounds.min` to 1.
pub fn normalize_anomaly(raw: f64, bounds: Option<ScoreBounds>) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }

    let ScoreBounds { min, mut max } = bounds.unwrap_or_default();
    if max <= min {
        max = min + BOUNDS_EPSILON;
    }

    unit_interval((max - raw) / (max - min))
}

pub fn fuse(fraud_probability: f64, normalized_anomaly: f64, params: &FusionParams) -> f64 {
    match params.method {
        FusionMethod::Convex => fuse_convex(fraud_probability, normalized_anomaly, params.alpha),
        FusionMethod::Logistic => fuse_logistic(
            fraud_probability,
            normalized_anomaly,
            params.beta0,
            params.beta1,
            params.beta2,
        ),
    }
}

pub fn fuse_convex(fraud_probability: f64, normalized_anomaly: f64, alpha: f64) -> f64 {
    let alpha = unit_interval(alpha);
    let p = unit_interval(fraud_probability);
    let a = unit_interval(normalized_anomaly);
    unit_interval(alpha * p + (1.0 - alpha) * a)
}

/// `sigmoid(beta0 + beta1 * p + beta2 * a)`; monotonic when `beta1` and `beta2` are positive.
pub fn fuse_logistic(
    fraud_probability: f64,
    normalized_anomaly: f64,
    beta0: f64,
    beta1: f64,
    beta2: f64,
) -> f64 {
    let p = unit_interval(fraud_probability);
    let a = unit_interval(normalized_anomaly);
    let z = beta0 + beta1 * p + beta2 * a;

    if z.is_nan() {
        return 0.0;
    }
    if z <= -SIGMOID_SATURATION {
        return 0.0;
    }
    if z >= SIGMOID_SATURATION {
        return 1.0;
    }

    unit_interval(1.0 / (1.0 + (-z).exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<f64> {
        (0..=20).map(|step| step as f64 / 20.0).collect()
    }

    #[test]
    fn convex_fusion_stays_bounded_and_monotonic() {
        for alpha in grid() {
            for p in grid() {
                let mut previous = f64::NEG_INFINITY;
                for a in grid() {
                    let risk = fuse_convex(p, a, alpha);
                    assert!((0.0..=1.0).contains(&risk), "risk {risk} out of range");
                    assert!(risk + 1e-12 >= previous, "not monotonic in anomaly");
                    previous = risk;
                }
            }
            for a in grid() {
                let mut previous = f64::NEG_INFINITY;
                for p in grid() {
                    let risk = fuse_convex(p, a, alpha);
                    assert!(risk + 1e-12 >= previous, "not monotonic in probability");
                    previous = risk;
                }
            }
        }
    }

    #[test]
    fn convex_fusion_matches_weighted_average() {
        let risk = fuse_convex(0.6, 0.9, 0.65);
        assert!((risk - 0.705).abs() < 1e-9);
    }

    #[test]
    fn logistic_fusion_is_centered_and_saturates() {
        let centered = fuse_logistic(0.5, 0.5, -2.0, 2.0, 2.0);
        assert!((centered - 0.5).abs() < 1e-9);

        assert_eq!(fuse_logistic(1.0, 1.0, 5_000.0, 2.0, 2.0), 1.0);
        assert_eq!(fuse_logistic(0.0, 0.0, -5_000.0, 2.0, 2.0), 0.0);
        assert!(fuse_logistic(0.9, 0.2, -2.0, 2.0, 2.0) > fuse_logistic(0.6, 0.2, -2.0, 2.0, 2.0));
    }

    #[test]
    fn normalization_follows_bounds_direction() {
        let bounds = Some(ScoreBounds::new(-0.5, 0.1));
        assert_eq!(normalize_anomaly(0.1, bounds), 0.0);
        assert_eq!(normalize_anomaly(-0.5, bounds), 1.0);
        assert_eq!(normalize_anomaly(3.0, bounds), 0.0);
        assert_eq!(normalize_anomaly(-3.0, bounds), 1.0);

        let mut previous = f64::INFINITY;
        for step in 0..=30 {
            let raw = -0.8 + step as f64 * 0.04;
            let normalized = normalize_anomaly(raw, bounds);
            assert!(normalized <= previous + 1e-12);
            previous = normalized;
        }
    }

    #[test]
    fn normalization_widens_degenerate_bounds_and_uses_defaults() {
        let degenerate = Some(ScoreBounds::new(0.3, 0.3));
        assert_eq!(normalize_anomaly(0.3, degenerate), 1.0);
        assert_eq!(normalize_anomaly(0.4, degenerate), 0.0);

        assert_eq!(normalize_anomaly(ScoreBounds::DEFAULT_MAX, None), 0.0);
        assert_eq!(normalize_anomaly(ScoreBounds::DEFAULT_MIN, None), 1.0);
    }

    #[test]
    fn non_finite_inputs_are_neutralized() {
        assert_eq!(normalize_anomaly(f64::NAN, None), 0.0);
        assert_eq!(normalize_anomaly(f64::NEG_INFINITY, None), 0.0);
        assert_eq!(fuse_convex(f64::NAN, 0.4, 0.5), 0.2);
        assert!((0.0..=1.0).contains(&fuse_logistic(f64::NAN, f64::NAN, -2.0, 2.0, 2.0)));
    }

    #[test]
    fn unknown_method_names_fall_back_to_convex() {
        assert_eq!(FusionMethod::from_name("logistic"), FusionMethod::Logistic);
        assert_eq!(FusionMethod::from_name(" Logistic "), FusionMethod::Logistic);
        assert_eq!(FusionMethod::from_name("stacked-gbm"), FusionMethod::Convex);
        assert_eq!(FusionMethod::from_name(""), FusionMethod::Convex);
    }
}
