//! `lens-priors` library crate.
//!
//! The binary (`priors`) is a thin wrapper around this library so that:
//!
//! - prior resolution is testable without spawning processes
//! - a fitting pipeline can embed the engine directly

pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod limits;
pub mod math;
pub mod prior;
pub mod report;
pub mod schema;
pub mod width;

pub use domain::{EngineConfig, MeanOutsideSupport, ParameterKey, PriorFamily, PriorSpec};
pub use engine::PriorResolutionEngine;
pub use error::PriorError;
pub use prior::{PriorFactory, ResolvedPrior};
pub use schema::PriorSchemaStore;
