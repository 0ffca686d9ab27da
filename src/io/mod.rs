//! Input/output helpers.
//!
//! - schema JSON read/write (`schema`)
//! - resolved prior exports (CSV) (`export`)

pub mod export;
pub mod schema;

pub use export::*;
pub use schema::*;
