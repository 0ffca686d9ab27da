//! The validated, immutable description of one parameter's prior.
//!
//! A `PriorSpec` can only be built through its constructors, which enforce
//! every invariant of the schema. Anything holding a `PriorSpec` may assume:
//!
//! - limits are not NaN and `lower_limit < upper_limit`
//! - Gaussian: finite `mean`, finite `sigma > 0`
//! - Uniform / LogUniform: finite limits, `gaussian_limits` present and ordered
//! - LogUniform: `lower_limit > 0`
//! - the width modifier value is finite and `> 0`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entry::PriorEntry;
use crate::domain::types::{GaussianLimits, PriorFamily, WidthModifier};
use crate::limits::LimitEnforcer;

/// Why a set of values cannot form a `PriorSpec`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SpecViolation(pub String);

fn violation(message: impl Into<String>) -> SpecViolation {
    SpecViolation(message.into())
}

/// Family-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorShape {
    Gaussian { mean: f64, sigma: f64 },
    Uniform { gaussian_limits: GaussianLimits },
    LogUniform { gaussian_limits: GaussianLimits },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PriorEntry", into = "PriorEntry")]
pub struct PriorSpec {
    shape: PriorShape,
    lower_limit: f64,
    upper_limit: f64,
    width_modifier: WidthModifier,
}

impl PriorSpec {
    pub fn gaussian(
        mean: f64,
        sigma: f64,
        lower_limit: f64,
        upper_limit: f64,
        width_modifier: WidthModifier,
    ) -> Result<Self, SpecViolation> {
        if !mean.is_finite() {
            return Err(violation(format!("mean must be finite, got {mean}")));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(violation(format!("sigma must be finite and > 0, got {sigma}")));
        }
        check_limits("lower_limit/upper_limit", lower_limit, upper_limit)?;
        check_width_modifier(&width_modifier)?;

        Ok(Self {
            shape: PriorShape::Gaussian { mean, sigma },
            lower_limit,
            upper_limit,
            width_modifier,
        })
    }

    pub fn uniform(
        lower_limit: f64,
        upper_limit: f64,
        gaussian_limits: GaussianLimits,
        width_modifier: WidthModifier,
    ) -> Result<Self, SpecViolation> {
        check_flat_limits(PriorFamily::Uniform, lower_limit, upper_limit)?;
        check_limits("gaussian_limits", gaussian_limits.lower, gaussian_limits.upper)?;
        check_width_modifier(&width_modifier)?;

        Ok(Self {
            shape: PriorShape::Uniform { gaussian_limits },
            lower_limit,
            upper_limit,
            width_modifier,
        })
    }

    pub fn log_uniform(
        lower_limit: f64,
        upper_limit: f64,
        gaussian_limits: GaussianLimits,
        width_modifier: WidthModifier,
    ) -> Result<Self, SpecViolation> {
        check_flat_limits(PriorFamily::LogUniform, lower_limit, upper_limit)?;
        if lower_limit <= 0.0 {
            return Err(violation(format!(
                "LogUniform lower_limit must be > 0, got {lower_limit}"
            )));
        }
        check_limits("gaussian_limits", gaussian_limits.lower, gaussian_limits.upper)?;
        check_width_modifier(&width_modifier)?;

        Ok(Self {
            shape: PriorShape::LogUniform { gaussian_limits },
            lower_limit,
            upper_limit,
            width_modifier,
        })
    }

    pub fn family(&self) -> PriorFamily {
        match self.shape {
            PriorShape::Gaussian { .. } => PriorFamily::Gaussian,
            PriorShape::Uniform { .. } => PriorFamily::Uniform,
            PriorShape::LogUniform { .. } => PriorFamily::LogUniform,
        }
    }

    pub fn shape(&self) -> &PriorShape {
        &self.shape
    }

    pub fn lower_limit(&self) -> f64 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> f64 {
        self.upper_limit
    }

    pub fn width_modifier(&self) -> WidthModifier {
        self.width_modifier
    }

    /// `Some` only for Uniform / LogUniform entries.
    pub fn gaussian_limits(&self) -> Option<GaussianLimits> {
        match self.shape {
            PriorShape::Gaussian { .. } => None,
            PriorShape::Uniform { gaussian_limits } | PriorShape::LogUniform { gaussian_limits } => {
                Some(gaussian_limits)
            }
        }
    }
}

fn check_limits(field: &str, lower: f64, upper: f64) -> Result<(), SpecViolation> {
    LimitEnforcer::validate_bounds(lower, upper).map_err(|e| violation(format!("{field}: {e}")))?;
    if lower == upper {
        return Err(violation(format!("{field}: empty interval [{lower}, {upper}]")));
    }
    Ok(())
}

fn check_flat_limits(family: PriorFamily, lower: f64, upper: f64) -> Result<(), SpecViolation> {
    if !(lower.is_finite() && upper.is_finite()) {
        return Err(violation(format!(
            "{family} limits must be finite, got [{lower}, {upper}]"
        )));
    }
    check_limits("lower_limit/upper_limit", lower, upper)
}

fn check_width_modifier(width_modifier: &WidthModifier) -> Result<(), SpecViolation> {
    let value = width_modifier.value;
    if !(value.is_finite() && value > 0.0) {
        return Err(violation(format!(
            "width_modifier value must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

impl TryFrom<PriorEntry> for PriorSpec {
    type Error = SpecViolation;

    fn try_from(entry: PriorEntry) -> Result<Self, Self::Error> {
        match entry.family {
            PriorFamily::Gaussian => {
                if entry.gaussian_limits.is_some() {
                    return Err(violation("Gaussian entries must not carry gaussian_limits"));
                }
                let mean = entry.mean.ok_or_else(|| violation("Gaussian entry is missing 'mean'"))?;
                let sigma = entry
                    .sigma
                    .ok_or_else(|| violation("Gaussian entry is missing 'sigma'"))?;
                PriorSpec::gaussian(
                    mean,
                    sigma,
                    entry.lower_limit,
                    entry.upper_limit,
                    entry.width_modifier,
                )
            }
            family @ (PriorFamily::Uniform | PriorFamily::LogUniform) => {
                if entry.mean.is_some() || entry.sigma.is_some() {
                    return Err(violation(format!("{family} entries must not carry mean/sigma")));
                }
                let gaussian_limits = entry
                    .gaussian_limits
                    .ok_or_else(|| violation(format!("{family} entry is missing 'gaussian_limits'")))?;
                if family == PriorFamily::Uniform {
                    PriorSpec::uniform(
                        entry.lower_limit,
                        entry.upper_limit,
                        gaussian_limits,
                        entry.width_modifier,
                    )
                } else {
                    PriorSpec::log_uniform(
                        entry.lower_limit,
                        entry.upper_limit,
                        gaussian_limits,
                        entry.width_modifier,
                    )
                }
            }
        }
    }
}

impl From<PriorSpec> for PriorEntry {
    fn from(spec: PriorSpec) -> Self {
        let (mean, sigma, gaussian_limits) = match spec.shape {
            PriorShape::Gaussian { mean, sigma } => (Some(mean), Some(sigma), None),
            PriorShape::Uniform { gaussian_limits } | PriorShape::LogUniform { gaussian_limits } => {
                (None, None, Some(gaussian_limits))
            }
        };
        PriorEntry {
            family: spec.family(),
            lower_limit: spec.lower_limit,
            upper_limit: spec.upper_limit,
            width_modifier: spec.width_modifier,
            mean,
            sigma,
            gaussian_limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_rejects_non_positive_sigma() {
        let wm = WidthModifier::absolute(0.05);
        assert!(PriorSpec::gaussian(0.0, 0.0, f64::NEG_INFINITY, f64::INFINITY, wm).is_err());
        assert!(PriorSpec::gaussian(0.0, -1.0, f64::NEG_INFINITY, f64::INFINITY, wm).is_err());
        assert!(PriorSpec::gaussian(0.0, 0.3, f64::NEG_INFINITY, f64::INFINITY, wm).is_ok());
    }

    #[test]
    fn log_uniform_requires_positive_lower_limit() {
        let wm = WidthModifier::relative(0.5);
        let gl = GaussianLimits::new(0.0, f64::INFINITY);
        let err = PriorSpec::log_uniform(0.0, 1.0, gl, wm).unwrap_err();
        assert!(err.0.contains("> 0"), "{err}");
        assert!(PriorSpec::log_uniform(1e-6, 1.0, gl, wm).is_ok());
    }

    #[test]
    fn flat_priors_need_finite_ordered_limits() {
        let wm = WidthModifier::relative(0.5);
        let gl = GaussianLimits::unbounded();
        assert!(PriorSpec::uniform(0.0, f64::INFINITY, gl, wm).is_err());
        assert!(PriorSpec::uniform(1.0, 0.0, gl, wm).is_err());
        assert!(PriorSpec::uniform(1.0, 1.0, gl, wm).is_err());
    }

    #[test]
    fn width_modifier_must_be_positive() {
        let gl = GaussianLimits::unbounded();
        assert!(PriorSpec::uniform(0.0, 1.0, gl, WidthModifier::relative(0.0)).is_err());
        assert!(PriorSpec::uniform(0.0, 1.0, gl, WidthModifier::absolute(f64::NAN)).is_err());
    }

    #[test]
    fn gaussian_limits_only_exposed_for_flat_families() {
        let wm = WidthModifier::relative(0.2);
        let gl = GaussianLimits::new(0.0, f64::INFINITY);
        let uniform = PriorSpec::uniform(0.0, 1.0, gl, wm).unwrap();
        assert_eq!(uniform.gaussian_limits(), Some(gl));

        let gaussian = PriorSpec::gaussian(0.0, 0.3, f64::NEG_INFINITY, f64::INFINITY, wm).unwrap();
        assert_eq!(gaussian.gaussian_limits(), None);
    }

    #[test]
    fn entry_with_wrong_family_fields_is_rejected() {
        let json = r#"{
            "type": "Gaussian", "mean": 0.0, "sigma": 0.3,
            "lower_limit": "-inf", "upper_limit": "inf",
            "width_modifier": {"type": "Absolute", "value": 0.05},
            "gaussian_limits": {"lower": "-inf", "upper": "inf"}
        }"#;
        let err = serde_json::from_str::<PriorSpec>(json).unwrap_err();
        assert!(err.to_string().contains("gaussian_limits"), "{err}");

        let json = r#"{
            "type": "Uniform", "lower_limit": 0.0, "upper_limit": 1.0,
            "width_modifier": {"type": "Relative", "value": 0.2}
        }"#;
        let err = serde_json::from_str::<PriorSpec>(json).unwrap_err();
        assert!(err.to_string().contains("gaussian_limits"), "{err}");
    }

    #[test]
    fn serialized_spec_reloads_bit_identical() {
        let spec = PriorSpec::uniform(
            0.1 + 0.2,
            1.0 / 3.0,
            GaussianLimits::new(0.0, f64::INFINITY),
            WidthModifier::relative(0.2),
        )
        .unwrap();

        let json = serde_json::to_string(&spec).unwrap();
        let back: PriorSpec = serde_json::from_str(&json).unwrap();

        assert_eq!(back.lower_limit().to_bits(), spec.lower_limit().to_bits());
        assert_eq!(back.upper_limit().to_bits(), spec.upper_limit().to_bits());
        assert_eq!(
            back.width_modifier().value.to_bits(),
            spec.width_modifier().value.to_bits()
        );
        assert_eq!(back.gaussian_limits(), spec.gaussian_limits());
    }
}
