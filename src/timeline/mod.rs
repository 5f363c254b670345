//! Output timeline model.

/// Content-derived timeline ids.
pub mod fingerprint;
/// Timeline data types and validation.
pub mod model;
