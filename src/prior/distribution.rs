//! Resolved prior distributions.
//!
//! A `ResolvedPrior` is what a sampler actually consumes. Each variant supports:
//!
//! - `value_for_unit(u)`: map `u ∈ [0, 1]` to a physical value (inverse CDF),
//!   the unit-hypercube transform nested samplers work in
//! - `log_density(x)`: normalised log density, `-inf` outside the support
//! - random draws through `rand_distr::Distribution<f64>`
//!
//! Values produced by `value_for_unit` and by sampling are finite and lie
//! inside the support, including at `u = 0` / `u = 1` and for infinite sides.
//! A truncated Gaussian whose mean sits far outside its support (hundreds of
//! sigmas) keeps a finite density; its draws pile up just past the bound.

use rand::Rng;
use rand::distributions::Open01;
use rand_distr::{Distribution, StandardNormal};

use crate::domain::PriorFamily;
use crate::error::PriorError;
use crate::limits::LimitEnforcer;
use crate::math::{interval_quantile, log_interval_mass, log_pdf};

/// Below this support mass, rejection sampling from the parent Gaussian is
/// replaced by inverse-CDF sampling.
const REJECTION_MIN_MASS: f64 = 0.3;
const REJECTION_MAX_TRIES: usize = 64;

/// Unit-interval inputs are kept this far from 0 and 1, so an open side maps
/// to a finite value. `1 - U_EDGE` is exactly representable.
const U_EDGE: f64 = f64::EPSILON / 2.0;

/// Gaussian truncated to `[lower, upper]` (either side may be infinite).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedGaussian {
    mean: f64,
    sigma: f64,
    lower: f64,
    upper: f64,
    /// Standardised bounds and the log of the parent's probability mass between them.
    alpha: f64,
    beta: f64,
    log_mass: f64,
}

impl TruncatedGaussian {
    /// Build the distribution. `sigma` must be finite and positive and the
    /// bounds ordered; `PriorSpec` guarantees both.
    ///
    /// Fails with `EmptySupport` only when the support is too narrow, relative
    /// to `sigma`, to carry any representable mass.
    pub fn new(mean: f64, sigma: f64, lower: f64, upper: f64) -> Result<Self, PriorError> {
        let alpha = (lower - mean) / sigma;
        let beta = (upper - mean) / sigma;
        let log_mass = log_interval_mass(alpha, beta);
        if !log_mass.is_finite() {
            return Err(PriorError::EmptySupport {
                mean,
                sigma,
                lower,
                upper,
            });
        }
        Ok(Self {
            mean,
            sigma,
            lower,
            upper,
            alpha,
            beta,
            log_mass,
        })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Probability mass the untruncated Gaussian places on the support.
    ///
    /// Underflows to 0 far in a tail; `log_support_mass` stays finite.
    pub fn support_mass(&self) -> f64 {
        self.log_mass.exp()
    }

    pub fn log_support_mass(&self) -> f64 {
        self.log_mass
    }

    pub fn value_for_unit(&self, u: f64) -> f64 {
        let z = interval_quantile(self.alpha, self.beta, u.clamp(U_EDGE, 1.0 - U_EDGE));
        LimitEnforcer::clip(self.mean + self.sigma * z, self.lower, self.upper)
    }

    pub fn log_density(&self, x: f64) -> f64 {
        if !(x >= self.lower && x <= self.upper) {
            return f64::NEG_INFINITY;
        }
        log_pdf((x - self.mean) / self.sigma) - self.sigma.ln() - self.log_mass
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.log_mass >= REJECTION_MIN_MASS.ln() {
            for _ in 0..REJECTION_MAX_TRIES {
                let z: f64 = rng.sample(StandardNormal);
                let x = self.mean + self.sigma * z;
                if x >= self.lower && x <= self.upper {
                    return x;
                }
            }
        }
        self.value_for_unit(rng.sample(Open01))
    }
}

/// Flat density on `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformPrior {
    low: f64,
    high: f64,
}

impl UniformPrior {
    /// `low < high`, both finite.
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn value_for_unit(&self, u: f64) -> f64 {
        let x = self.low + u.clamp(0.0, 1.0) * (self.high - self.low);
        LimitEnforcer::clip(x, self.low, self.high)
    }

    pub fn log_density(&self, x: f64) -> f64 {
        if x >= self.low && x <= self.high {
            -(self.high - self.low).ln()
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// Density flat in `ln x` on `[low, high]`, `0 < low < high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogUniformPrior {
    low: f64,
    high: f64,
}

impl LogUniformPrior {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn value_for_unit(&self, u: f64) -> f64 {
        let (ln_low, ln_high) = (self.low.ln(), self.high.ln());
        let x = (ln_low + u.clamp(0.0, 1.0) * (ln_high - ln_low)).exp();
        LimitEnforcer::clip(x, self.low, self.high)
    }

    pub fn log_density(&self, x: f64) -> f64 {
        if x >= self.low && x <= self.high {
            -(x * (self.high / self.low).ln()).ln()
        } else {
            f64::NEG_INFINITY
        }
    }
}

/// A sampleable prior for one parameter in one fitting phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedPrior {
    Gaussian(TruncatedGaussian),
    Uniform(UniformPrior),
    LogUniform(LogUniformPrior),
}

impl ResolvedPrior {
    pub fn family(&self) -> PriorFamily {
        match self {
            ResolvedPrior::Gaussian(_) => PriorFamily::Gaussian,
            ResolvedPrior::Uniform(_) => PriorFamily::Uniform,
            ResolvedPrior::LogUniform(_) => PriorFamily::LogUniform,
        }
    }

    /// Effective support `(lower, upper)`; infinite entries mean an open side.
    pub fn support(&self) -> (f64, f64) {
        match self {
            ResolvedPrior::Gaussian(g) => (g.lower, g.upper),
            ResolvedPrior::Uniform(u) => (u.low, u.high),
            ResolvedPrior::LogUniform(l) => (l.low, l.high),
        }
    }

    pub fn contains(&self, x: f64) -> bool {
        let (lower, upper) = self.support();
        x >= lower && x <= upper
    }

    pub fn as_gaussian(&self) -> Option<&TruncatedGaussian> {
        match self {
            ResolvedPrior::Gaussian(g) => Some(g),
            _ => None,
        }
    }

    pub fn value_for_unit(&self, u: f64) -> f64 {
        match self {
            ResolvedPrior::Gaussian(g) => g.value_for_unit(u),
            ResolvedPrior::Uniform(p) => p.value_for_unit(u),
            ResolvedPrior::LogUniform(p) => p.value_for_unit(u),
        }
    }

    pub fn log_density(&self, x: f64) -> f64 {
        match self {
            ResolvedPrior::Gaussian(g) => g.log_density(x),
            ResolvedPrior::Uniform(p) => p.log_density(x),
            ResolvedPrior::LogUniform(p) => p.log_density(x),
        }
    }
}

impl Distribution<f64> for ResolvedPrior {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ResolvedPrior::Gaussian(g) => g.draw(rng),
            ResolvedPrior::Uniform(p) => p.value_for_unit(rng.sample(Open01)),
            ResolvedPrior::LogUniform(p) => p.value_for_unit(rng.sample(Open01)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn uniform_maps_unit_interval_linearly() {
        let p = ResolvedPrior::Uniform(UniformPrior::new(0.0, 2.0));
        assert_eq!(p.value_for_unit(0.0), 0.0);
        assert_eq!(p.value_for_unit(0.25), 0.5);
        assert_eq!(p.value_for_unit(1.0), 2.0);
        assert!((p.log_density(1.0) - (-(2.0f64).ln())).abs() < 1e-12);
        assert_eq!(p.log_density(2.5), f64::NEG_INFINITY);
    }

    #[test]
    fn log_uniform_is_flat_in_log_space() {
        let p = ResolvedPrior::LogUniform(LogUniformPrior::new(1e-2, 1e2));
        assert!((p.value_for_unit(0.5) - 1.0).abs() < 1e-12);
        assert!((p.value_for_unit(0.75) - 10.0).abs() < 1e-9);
        // x * density(x) is constant.
        let a = 0.05f64;
        let b = 20.0f64;
        let lhs = (a.ln() + p.log_density(a)).exp();
        let rhs = (b.ln() + p.log_density(b)).exp();
        assert!((lhs - rhs).abs() < 1e-12);
    }

    #[test]
    fn untruncated_gaussian_matches_normal_quantiles() {
        let g = TruncatedGaussian::new(1.0, 2.0, f64::NEG_INFINITY, f64::INFINITY).unwrap();
        assert!((g.support_mass() - 1.0).abs() < 1e-12);
        assert!((g.value_for_unit(0.5) - 1.0).abs() < 1e-6);
        assert!((g.value_for_unit(0.975) - (1.0 + 2.0 * 1.959_964)).abs() < 1e-4);
        let (low, high) = (g.value_for_unit(0.0), g.value_for_unit(1.0));
        assert!(low.is_finite() && high.is_finite(), "low={low} high={high}");
        assert!(low < 1.0 - 2.0 * 8.0 && high > 1.0 + 2.0 * 8.0);
    }

    #[test]
    fn half_gaussian_density_doubles() {
        let full = TruncatedGaussian::new(0.0, 1.0, f64::NEG_INFINITY, f64::INFINITY).unwrap();
        let half = TruncatedGaussian::new(0.0, 1.0, 0.0, f64::INFINITY).unwrap();
        let diff = half.log_density(0.5) - full.log_density(0.5);
        assert!((diff - 2.0f64.ln()).abs() < 1e-6);
        assert_eq!(half.log_density(-0.1), f64::NEG_INFINITY);
        assert!(half.value_for_unit(0.0) >= 0.0);
    }

    #[test]
    fn mean_far_below_support_still_maps_into_support() {
        let g = TruncatedGaussian::new(-5.0, 1.0, 0.0, f64::INFINITY).unwrap();
        for &u in &[0.0, 0.1, 0.5, 0.99] {
            let x = g.value_for_unit(u);
            assert!(x >= 0.0 && x.is_finite(), "u={u} x={x}");
        }
    }

    #[test]
    fn empty_support_is_reported() {
        // [0, 1e-10] is a vanishing sliver of a Gaussian with sigma 1e300.
        let err = TruncatedGaussian::new(0.0, 1e300, 0.0, 1e-10).unwrap_err();
        assert!(matches!(err, PriorError::EmptySupport { .. }));
    }

    #[test]
    fn samples_stay_in_support_and_are_seed_deterministic() {
        let priors = [
            ResolvedPrior::Gaussian(TruncatedGaussian::new(0.4, 0.08, 0.0, f64::INFINITY).unwrap()),
            ResolvedPrior::Gaussian(TruncatedGaussian::new(-5.0, 0.5, 0.0, f64::INFINITY).unwrap()),
            ResolvedPrior::Uniform(UniformPrior::new(0.0, 1.0)),
            ResolvedPrior::LogUniform(LogUniformPrior::new(1e-6, 1e3)),
        ];
        for prior in priors {
            let mut rng = StdRng::seed_from_u64(7);
            let draws: Vec<f64> = (0..500).map(|_| prior.sample(&mut rng)).collect();
            assert!(draws.iter().all(|&x| prior.contains(x)), "{prior:?}");

            let mut rng = StdRng::seed_from_u64(7);
            let again: Vec<f64> = (0..500).map(|_| prior.sample(&mut rng)).collect();
            assert_eq!(draws, again);
        }
    }

    #[test]
    fn mean_hundreds_of_sigmas_below_support_stays_usable() {
        // mean -5, sigma 0.05: the lower bound sits 100 sigma above the mean.
        let g = TruncatedGaussian::new(-5.0, 0.05, 0.0, f64::INFINITY).unwrap();
        assert_eq!(g.support_mass(), 0.0);
        assert!(g.log_support_mass().is_finite());

        // The tail is close to an exponential with rate alpha / sigma = 2000.
        assert!(g.log_density(0.0).is_finite());
        assert!((g.log_density(0.0) - 2000.0f64.ln()).abs() < 0.01);
        let median = g.value_for_unit(0.5);
        assert!(median >= 0.0 && (median - 2.0f64.ln() / 2000.0).abs() < 1e-5, "median={median}");
        assert!(g.value_for_unit(1.0).is_finite());

        let prior = ResolvedPrior::Gaussian(g);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1_000 {
            let x = prior.sample(&mut rng);
            assert!(x >= 0.0 && x.is_finite(), "x={x}");
        }
    }

    #[test]
    fn gaussian_sample_mean_is_close_to_mean() {
        let prior =
            ResolvedPrior::Gaussian(TruncatedGaussian::new(0.12, 0.05, f64::NEG_INFINITY, f64::INFINITY).unwrap());
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mean = (0..n).map(|_| prior.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 0.12).abs() < 0.005, "mean={mean}");
    }
}
