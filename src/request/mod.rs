//! Composition request model.

/// Fluent request builder.
pub mod dsl;
/// Request data types and validation.
pub mod model;
/// Tunable pipeline constants.
pub mod opts;
