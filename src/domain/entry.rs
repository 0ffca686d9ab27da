//! The document form of one schema entry.
//!
//! `PriorEntry` mirrors the configuration document field for field. It is only
//! a staging type: `PriorSpec::try_from` turns it into a validated spec, and
//! `PriorEntry::from(spec)` turns a spec back into its canonical document form.

use serde::{Deserialize, Serialize};

use crate::domain::types::{GaussianLimits, PriorFamily, WidthModifier};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PriorEntry {
    #[serde(rename = "type")]
    pub family: PriorFamily,
    #[serde(with = "crate::domain::bound")]
    pub lower_limit: f64,
    #[serde(with = "crate::domain::bound")]
    pub upper_limit: f64,
    pub width_modifier: WidthModifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaussian_limits: Option<GaussianLimits>,
}
