//! The prior schema: every configured (model class, parameter) entry, validated
//! at construction and read-only afterwards.

pub mod store;

pub use store::*;
