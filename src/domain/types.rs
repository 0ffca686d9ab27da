//! Shared domain types.
//!
//! These types are small, `Copy` where possible, and serializable so that they
//! can appear both in the schema document and in exports.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Identifies one parameter of one model class in the schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterKey {
    pub model_class: String,
    pub parameter: String,
}

impl ParameterKey {
    pub fn new(model_class: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            model_class: model_class.into(),
            parameter: parameter.into(),
        }
    }
}

impl std::fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.model_class, self.parameter)
    }
}

/// The closed set of prior families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorFamily {
    Gaussian,
    Uniform,
    LogUniform,
}

impl PriorFamily {
    pub fn display_name(self) -> &'static str {
        match self {
            PriorFamily::Gaussian => "Gaussian",
            PriorFamily::Uniform => "Uniform",
            PriorFamily::LogUniform => "LogUniform",
        }
    }
}

impl std::fmt::Display for PriorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// How a derived prior's spread is computed from a best-fit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidthKind {
    /// `sigma = value`, in the parameter's physical units.
    Absolute,
    /// `sigma = |best_fit| * value`.
    Relative,
}

/// Width-narrowing rule attached to every schema entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidthModifier {
    #[serde(rename = "type")]
    pub kind: WidthKind,
    pub value: f64,
}

impl WidthModifier {
    pub fn absolute(value: f64) -> Self {
        Self {
            kind: WidthKind::Absolute,
            value,
        }
    }

    pub fn relative(value: f64) -> Self {
        Self {
            kind: WidthKind::Relative,
            value,
        }
    }

    /// The spread this rule assigns to a prior centred on `best_fit`.
    ///
    /// No positivity check happens here; see `WidthModifierResolver::narrow`.
    pub fn spread(&self, best_fit: f64) -> f64 {
        match self.kind {
            WidthKind::Absolute => self.value,
            WidthKind::Relative => best_fit.abs() * self.value,
        }
    }
}

/// Bounds used only when a Uniform / LogUniform entry is converted into a Gaussian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GaussianLimits {
    #[serde(with = "crate::domain::bound")]
    pub lower: f64,
    #[serde(with = "crate::domain::bound")]
    pub upper: f64,
}

impl GaussianLimits {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn unbounded() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }
}

/// What to do when a narrowed Gaussian's mean falls outside its support.
///
/// This happens when a best fit lies outside the `gaussian_limits` of the
/// original entry (e.g. a negative best fit for a mass bounded below by 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeanOutsideSupport {
    /// Fail the resolution with `MeanOutsideSupport`.
    #[default]
    Reject,
    /// Log a warning and keep the truncated prior (its mode sits on the nearest bound).
    Warn,
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    pub mean_outside_support: MeanOutsideSupport,
}
