use std::path::PathBuf;

use thiserror::Error;

use crate::domain::WidthKind;

/// Errors raised by schema loading and prior resolution.
///
/// Every variant is raised at the point of detection. Nothing here is retried
/// or silently corrected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriorError {
    /// A schema entry (or the document itself) is malformed or violates an invariant.
    #[error("invalid prior schema at {location}: {reason}")]
    InvalidSchema { location: String, reason: String },

    #[error("no prior configured for {model_class}.{parameter}")]
    UnknownParameter {
        model_class: String,
        parameter: String,
    },

    #[error("invalid bounds: lower={lower} > upper={upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("phase {phase_index} of {model_class}.{parameter} requires the previous phase's best fit")]
    MissingPreviousResult {
        model_class: String,
        parameter: String,
        phase_index: usize,
    },

    /// The narrowed spread collapsed to zero (or went negative / non-finite).
    #[error(
        "degenerate width: {kind:?} modifier {modifier} with best fit {best_fit} gives sigma={sigma}"
    )]
    DegenerateWidth {
        kind: WidthKind,
        modifier: f64,
        best_fit: f64,
        sigma: f64,
    },

    #[error("narrowed mean {mean} lies outside its support [{lower}, {upper}]")]
    MeanOutsideSupport { mean: f64, lower: f64, upper: f64 },

    #[error("{what} must be finite, got {value}")]
    NonFiniteValue { what: &'static str, value: f64 },

    /// A truncated Gaussian whose support carries no representable probability mass.
    #[error("Gaussian(mean={mean}, sigma={sigma}) has no probability mass on [{lower}, {upper}]")]
    EmptySupport {
        mean: f64,
        sigma: f64,
        lower: f64,
        upper: f64,
    },

    /// An engine setting (environment or flag) has an unusable value.
    #[error("invalid setting {setting}: {reason}")]
    InvalidConfig { setting: String, reason: String },

    #[error("schema file '{}': {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl PriorError {
    pub(crate) fn invalid_schema(location: impl Into<String>, reason: impl Into<String>) -> Self {
        PriorError::InvalidSchema {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Application-level error used by the `priors` binary.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PriorError> for AppError {
    fn from(err: PriorError) -> Self {
        // 2 = configuration, 3 = unknown key, 4 = resolution failure.
        let exit_code = match &err {
            PriorError::InvalidSchema { .. }
            | PriorError::InvalidConfig { .. }
            | PriorError::Io { .. } => 2,
            PriorError::UnknownParameter { .. } => 3,
            PriorError::InvalidBounds { .. }
            | PriorError::MissingPreviousResult { .. }
            | PriorError::DegenerateWidth { .. }
            | PriorError::MeanOutsideSupport { .. }
            | PriorError::NonFiniteValue { .. }
            | PriorError::EmptySupport { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
