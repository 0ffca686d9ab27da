//! Executable prior distributions.
//!
//! - `distribution`: the live `ResolvedPrior` objects handed to a sampler
//! - `factory`: turns a validated `PriorSpec` into a `ResolvedPrior`

pub mod distribution;
pub mod factory;

pub use distribution::*;
pub use factory::*;
