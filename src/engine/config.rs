//! Engine configuration from the environment.
//!
//! `.env` files are honoured through `dotenvy`, the same way the CLI picks up
//! its schema path.

use clap::ValueEnum;

use crate::domain::{EngineConfig, MeanOutsideSupport};
use crate::error::PriorError;

/// Environment variable selecting the mean-outside-support policy (`reject` | `warn`).
pub const POLICY_ENV: &str = "PRIORS_MEAN_OUTSIDE_SUPPORT";

impl EngineConfig {
    pub fn new(mean_outside_support: MeanOutsideSupport) -> Self {
        Self {
            mean_outside_support,
        }
    }

    pub fn from_env() -> Result<Self, PriorError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PriorError> {
        let Some(raw) = lookup(POLICY_ENV) else {
            return Ok(Self::default());
        };
        let policy = MeanOutsideSupport::from_str(raw.trim(), true).map_err(|reason| {
            PriorError::InvalidConfig {
                setting: POLICY_ENV.to_string(),
                reason,
            }
        })?;
        Ok(Self::new(policy))
    }
}
