//! Bound handling.
//!
//! Limits use `f64::NEG_INFINITY` / `f64::INFINITY` for an unbounded side, so
//! ordinary float comparisons already treat them as "no constraint". The only
//! special case is NaN, which is never a valid bound.

use tracing::warn;

use crate::domain::MeanOutsideSupport;
use crate::error::PriorError;

/// Stateless bound checks shared by schema loading and narrowing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitEnforcer;

impl LimitEnforcer {
    /// Return `value` if it lies in `[lower, upper]`, otherwise the nearer bound.
    ///
    /// Callers must pass bounds that already passed `validate_bounds`.
    pub fn clip(value: f64, lower: f64, upper: f64) -> f64 {
        if value < lower {
            lower
        } else if value > upper {
            upper
        } else {
            value
        }
    }

    /// Fail with `InvalidBounds` when `lower > upper` or either bound is NaN.
    pub fn validate_bounds(lower: f64, upper: f64) -> Result<(), PriorError> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(PriorError::InvalidBounds { lower, upper });
        }
        Ok(())
    }

    /// Apply the mean-outside-support policy to a narrowed Gaussian.
    pub fn check_mean_in_support(
        mean: f64,
        lower: f64,
        upper: f64,
        policy: MeanOutsideSupport,
    ) -> Result<(), PriorError> {
        let clipped = Self::clip(mean, lower, upper);
        if clipped == mean {
            return Ok(());
        }
        match policy {
            MeanOutsideSupport::Reject => Err(PriorError::MeanOutsideSupport { mean, lower, upper }),
            MeanOutsideSupport::Warn => {
                warn!(
                    mean,
                    lower,
                    upper,
                    nearest_support = clipped,
                    "narrowed mean lies outside its support; prior mass concentrates at the bound"
                );
                Ok(())
            }
        }
    }
}
