//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - keys and enums (`ParameterKey`, `PriorFamily`, `WidthKind`, `MeanOutsideSupport`)
//! - the validated, immutable prior description (`PriorSpec`)
//! - the on-disk entry form (`PriorEntry`) and its limit normalisation (`bound`)

pub mod bound;
pub mod entry;
pub mod spec;
pub mod types;

pub use entry::*;
pub use spec::*;
pub use types::*;
