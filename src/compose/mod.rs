//! Composition pipeline.
//!
//! Stages run in a fixed order: resolve references, normalize durations (sequence mode) or
//! interleave cutaways (cutaway mode), then fit and shift tracks around the leads. Each stage is
//! a pure function over its inputs and reports healed problems as [`diagnostics::Diagnostic`]s.

/// Top-level orchestration.
pub mod assemble;
/// Non-fatal events reported next to the timeline.
pub mod diagnostics;
/// Cutaway insertion over continuous speaker audio.
pub mod interleave;
/// Duration scaling to the target.
pub mod normalize;
/// Track fitting and lead offset propagation.
pub mod offset;
/// Transition overlap arithmetic.
pub mod overlap;
/// Reference resolution and library deduplication.
pub mod resolve;
