//! Width narrowing between fitting phases.
//!
//! Given the static schema entry for a parameter and the best-fit value from
//! phase N, build the Gaussian spec used in phase N+1:
//!
//! ```text
//! sigma = value               (Absolute)
//! sigma = |best_fit| * value  (Relative)
//! mean  = best_fit
//! bounds = gaussian_limits    (Uniform / LogUniform entries)
//!        = lower/upper_limit  (Gaussian entries)
//! ```
//!
//! Relative modifiers suit strictly positive scale quantities (masses, radii)
//! whose uncertainty grows with their magnitude. Absolute modifiers suit
//! quantities such as centres, whose uncertainty is set by the data's
//! resolution.

use tracing::debug;

use crate::domain::{MeanOutsideSupport, PriorShape, PriorSpec};
use crate::error::PriorError;
use crate::limits::LimitEnforcer;

#[derive(Debug, Clone, Copy, Default)]
pub struct WidthModifierResolver {
    policy: MeanOutsideSupport,
}

impl WidthModifierResolver {
    pub fn new(policy: MeanOutsideSupport) -> Self {
        Self { policy }
    }

    /// Derive the next phase's spec from an original schema entry.
    ///
    /// `spec` must be the entry from the schema, not a previously narrowed spec.
    pub fn narrow(&self, spec: &PriorSpec, best_fit: f64) -> Result<PriorSpec, PriorError> {
        if !best_fit.is_finite() {
            return Err(PriorError::NonFiniteValue {
                what: "best-fit value",
                value: best_fit,
            });
        }

        let width_modifier = spec.width_modifier();
        let sigma = width_modifier.spread(best_fit);
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(PriorError::DegenerateWidth {
                kind: width_modifier.kind,
                modifier: width_modifier.value,
                best_fit,
                sigma,
            });
        }

        let (lower, upper) = match *spec.shape() {
            PriorShape::Gaussian { .. } => (spec.lower_limit(), spec.upper_limit()),
            PriorShape::Uniform { gaussian_limits } | PriorShape::LogUniform { gaussian_limits } => {
                (gaussian_limits.lower, gaussian_limits.upper)
            }
        };
        LimitEnforcer::validate_bounds(lower, upper)?;
        LimitEnforcer::check_mean_in_support(best_fit, lower, upper, self.policy)?;

        debug!(
            from = %spec.family(),
            mean = best_fit,
            sigma,
            lower,
            upper,
            "narrowed prior"
        );

        // The schema already validated these bounds and the width is checked
        // above, so this can only fail on an empty `[x, x]` interval.
        PriorSpec::gaussian(best_fit, sigma, lower, upper, width_modifier)
            .map_err(|_| PriorError::InvalidBounds { lower, upper })
    }
}
