//! Phase-aware prior resolution.
//!
//! The engine is the entry point a fitting pipeline talks to:
//!
//! - phase 0: schema entry → `PriorFactory::instantiate`
//! - phase N > 0: schema entry + phase N-1 best fit → `WidthModifierResolver::narrow`
//!   → `PriorFactory::instantiate`
//!
//! Narrowing always starts from the static schema entry, never from the
//! previous phase's narrowed spec, so repeated phases do not accumulate drift.
//! The engine holds no per-phase state; sequencing phases and feeding back
//! best fits is the caller's job.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{EngineConfig, PriorSpec};
use crate::error::PriorError;
use crate::prior::{PriorFactory, ResolvedPrior};
use crate::schema::PriorSchemaStore;
use crate::width::WidthModifierResolver;

pub mod config;

pub use config::*;

#[derive(Debug, Clone)]
pub struct PriorResolutionEngine {
    store: Arc<PriorSchemaStore>,
    config: EngineConfig,
    resolver: WidthModifierResolver,
}

impl PriorResolutionEngine {
    pub fn new(store: Arc<PriorSchemaStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            resolver: WidthModifierResolver::new(config.mean_outside_support),
        }
    }

    pub fn store(&self) -> &PriorSchemaStore {
        &self.store
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// The spec `resolve_for_phase` would instantiate.
    pub fn spec_for_phase(
        &self,
        model_class: &str,
        parameter: &str,
        phase_index: usize,
        previous_best_fit: Option<f64>,
    ) -> Result<PriorSpec, PriorError> {
        let original = self.store.lookup(model_class, parameter)?;

        if phase_index == 0 {
            if let Some(best_fit) = previous_best_fit {
                debug!(model_class, parameter, best_fit, "phase 0 ignores previous best fit");
            }
            return Ok(original);
        }

        let best_fit = previous_best_fit.ok_or_else(|| PriorError::MissingPreviousResult {
            model_class: model_class.to_string(),
            parameter: parameter.to_string(),
            phase_index,
        })?;
        self.resolver.narrow(&original, best_fit)
    }

    pub fn resolve_for_phase(
        &self,
        model_class: &str,
        parameter: &str,
        phase_index: usize,
        previous_best_fit: Option<f64>,
    ) -> Result<ResolvedPrior, PriorError> {
        let spec = self.spec_for_phase(model_class, parameter, phase_index, previous_best_fit)?;
        let prior = PriorFactory::instantiate(&spec)?;
        debug!(
            model_class,
            parameter,
            phase_index,
            family = %prior.family(),
            "resolved prior"
        );
        Ok(prior)
    }

    /// Resolve every parameter of a model class for one phase.
    ///
    /// Parameters are independent, so they resolve in parallel. The result is
    /// ordered by parameter name. For `phase_index > 0` every parameter needs an
    /// entry in `best_fits`; any failing parameter fails the whole call.
    pub fn resolve_model_for_phase(
        &self,
        model_class: &str,
        phase_index: usize,
        best_fits: &HashMap<String, f64>,
    ) -> Result<Vec<(String, ResolvedPrior)>, PriorError> {
        let parameters =
            self.store
                .parameters(model_class)
                .ok_or_else(|| PriorError::UnknownParameter {
                    model_class: model_class.to_string(),
                    parameter: "*".to_string(),
                })?;

        for name in best_fits.keys() {
            if !parameters.contains(&name.as_str()) {
                warn!(model_class, parameter = %name, "best fit supplied for a parameter the class does not have");
            }
        }

        parameters
            .par_iter()
            .map(|&parameter| {
                let best_fit = best_fits.get(parameter).copied();
                self.resolve_for_phase(model_class, parameter, phase_index, best_fit)
                    .map(|prior| (parameter.to_string(), prior))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MeanOutsideSupport, PriorFamily};

    fn engine(policy: MeanOutsideSupport) -> PriorResolutionEngine {
        let store = PriorSchemaStore::bundled().unwrap();
        PriorResolutionEngine::new(Arc::new(store), EngineConfig::new(policy))
    }

    #[test]
    fn phase_zero_matches_schema_for_every_entry() {
        let engine = engine(MeanOutsideSupport::Reject);
        for (key, spec) in engine.store().iter() {
            let prior = engine
                .resolve_for_phase(&key.model_class, &key.parameter, 0, None)
                .unwrap();
            assert_eq!(prior.family(), spec.family(), "{key}");
            assert_eq!(prior.support(), (spec.lower_limit(), spec.upper_limit()), "{key}");
        }
    }

    #[test]
    fn phase_zero_is_idempotent() {
        let engine = engine(MeanOutsideSupport::Reject);
        let a = engine.resolve_for_phase("SphericalNFW", "kappa_s", 0, None).unwrap();
        let b = engine.resolve_for_phase("SphericalNFW", "kappa_s", 0, Some(0.7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn spherical_nfw_kappa_s_narrows_relative() {
        let engine = engine(MeanOutsideSupport::Reject);

        let phase0 = engine.resolve_for_phase("SphericalNFW", "kappa_s", 0, None).unwrap();
        assert_eq!(phase0.family(), PriorFamily::Uniform);
        assert_eq!(phase0.support(), (0.0, 1.0));

        let phase1 = engine
            .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(0.4))
            .unwrap();
        let g = phase1.as_gaussian().unwrap();
        assert_eq!(g.mean(), 0.4);
        assert!((g.sigma() - 0.08).abs() < 1e-15);
        assert_eq!(phase1.support(), (0.0, f64::INFINITY));
    }

    #[test]
    fn elliptical_nfw_centre_narrows_absolute() {
        let engine = engine(MeanOutsideSupport::Reject);
        let phase1 = engine
            .resolve_for_phase("EllipticalNFW", "centre_0", 1, Some(0.12))
            .unwrap();
        let g = phase1.as_gaussian().unwrap();
        assert_eq!((g.mean(), g.sigma()), (0.12, 0.05));
        assert_eq!(phase1.support(), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn later_phases_narrow_from_the_schema_not_the_previous_phase() {
        let engine = engine(MeanOutsideSupport::Reject);
        let phase1 = engine
            .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(0.4))
            .unwrap();
        let phase5 = engine
            .resolve_for_phase("SphericalNFW", "kappa_s", 5, Some(0.4))
            .unwrap();
        assert_eq!(phase1, phase5);
    }

    #[test]
    fn later_phase_without_best_fit_fails() {
        let engine = engine(MeanOutsideSupport::Reject);
        let err = engine
            .resolve_for_phase("SphericalNFW", "kappa_s", 2, None)
            .unwrap_err();
        assert_eq!(
            err,
            PriorError::MissingPreviousResult {
                model_class: "SphericalNFW".to_string(),
                parameter: "kappa_s".to_string(),
                phase_index: 2,
            }
        );
    }

    #[test]
    fn zero_best_fit_with_relative_modifier_is_degenerate() {
        let engine = engine(MeanOutsideSupport::Reject);
        let err = engine
            .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(0.0))
            .unwrap_err();
        assert!(matches!(err, PriorError::DegenerateWidth { .. }));
    }

    #[test]
    fn negative_best_fit_below_gaussian_limits_follows_policy() {
        let rejecting = engine(MeanOutsideSupport::Reject);
        let err = rejecting
            .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(-5.0))
            .unwrap_err();
        assert!(matches!(err, PriorError::MeanOutsideSupport { .. }));

        let warning = engine(MeanOutsideSupport::Warn);
        let prior = warning
            .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(-5.0))
            .unwrap();
        let g = prior.as_gaussian().unwrap();
        assert_eq!(g.mean(), -5.0);
        assert_eq!(prior.support().0, 0.0);
    }

    #[test]
    fn narrow_absolute_width_far_below_support_is_accepted_under_warn() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;
        use rand_distr::Distribution;

        let json = r#"{"SphericalNFW": {"kappa_s": {
            "type": "Uniform", "lower_limit": 0.0, "upper_limit": 1.0,
            "width_modifier": {"type": "Absolute", "value": 0.05},
            "gaussian_limits": {"lower": 0.0, "upper": "inf"}
        }}}"#;
        let store = PriorSchemaStore::from_json_str(json).unwrap();
        let engine = PriorResolutionEngine::new(
            Arc::new(store),
            EngineConfig::new(MeanOutsideSupport::Warn),
        );
        assert_eq!(engine.config().mean_outside_support, MeanOutsideSupport::Warn);

        for best_fit in [-5.0, -2.0] {
            let prior = engine
                .resolve_for_phase("SphericalNFW", "kappa_s", 1, Some(best_fit))
                .unwrap();
            let g = prior.as_gaussian().unwrap();
            assert_eq!((g.mean(), g.sigma()), (best_fit, 0.05));
            assert_eq!(prior.support(), (0.0, f64::INFINITY));

            let mut rng = StdRng::seed_from_u64(3);
            let draws: Vec<f64> = prior.sample_iter(&mut rng).take(2_000).collect();
            assert!(draws.iter().all(|&x| x >= 0.0 && x.is_finite()), "best_fit={best_fit}");
            assert!(prior.log_density(draws[0]).is_finite());
        }
    }

    #[test]
    fn unknown_parameter_surfaces_from_lookup() {
        let engine = engine(MeanOutsideSupport::Reject);
        let err = engine
            .resolve_for_phase("SphericalNFW", "einstein_radius", 0, None)
            .unwrap_err();
        assert!(matches!(err, PriorError::UnknownParameter { .. }));
    }

    #[test]
    fn whole_model_resolves_in_name_order() {
        let engine = engine(MeanOutsideSupport::Reject);
        let phase0 = engine
            .resolve_model_for_phase("SphericalNFW", 0, &HashMap::new())
            .unwrap();
        let names: Vec<&str> = phase0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["centre_0", "centre_1", "kappa_s", "scale_radius"]);

        let best_fits: HashMap<String, f64> = [
            ("centre_0", 0.01),
            ("centre_1", -0.02),
            ("kappa_s", 0.4),
            ("scale_radius", 12.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let phase1 = engine
            .resolve_model_for_phase("SphericalNFW", 1, &best_fits)
            .unwrap();
        assert!(phase1.iter().all(|(_, p)| p.family() == PriorFamily::Gaussian));

        let mut partial = best_fits.clone();
        partial.remove("scale_radius");
        let err = engine
            .resolve_model_for_phase("SphericalNFW", 1, &partial)
            .unwrap_err();
        assert!(matches!(err, PriorError::MissingPreviousResult { ref parameter, .. } if parameter == "scale_radius"));
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PriorResolutionEngine>();
    }
}
