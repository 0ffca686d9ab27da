//! Instantiation of schema entries.
//!
//! The factory only looks at a spec's family parameters and its own limits. It
//! never reads `width_modifier` or `gaussian_limits`; those belong to the
//! narrowing step that produces the next phase's spec.

use tracing::debug;

use crate::domain::{PriorShape, PriorSpec};
use crate::error::PriorError;
use crate::prior::distribution::{LogUniformPrior, ResolvedPrior, TruncatedGaussian, UniformPrior};

#[derive(Debug, Clone, Copy, Default)]
pub struct PriorFactory;

impl PriorFactory {
    pub fn instantiate(spec: &PriorSpec) -> Result<ResolvedPrior, PriorError> {
        let (lower, upper) = (spec.lower_limit(), spec.upper_limit());
        let prior = match *spec.shape() {
            PriorShape::Gaussian { mean, sigma } => {
                ResolvedPrior::Gaussian(TruncatedGaussian::new(mean, sigma, lower, upper)?)
            }
            PriorShape::Uniform { .. } => ResolvedPrior::Uniform(UniformPrior::new(lower, upper)),
            PriorShape::LogUniform { .. } => {
                ResolvedPrior::LogUniform(LogUniformPrior::new(lower, upper))
            }
        };
        debug!(family = %prior.family(), lower, upper, "instantiated prior");
        Ok(prior)
    }
}
