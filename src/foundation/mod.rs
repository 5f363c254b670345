/// Time primitives, canvas/fps and comparison helpers.
pub mod core;
/// Crate error type and failure categories.
pub mod error;
