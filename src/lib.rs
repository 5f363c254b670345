//! Splicer is the timeline composition core of a video-generation pipeline.
//!
//! It turns proposed content (clips, speaker recordings, cutaways, audio beds, captions) into a
//! timing-consistent [`Timeline`] that a renderer can consume without further checks:
//!
//! - Build a [`CompositionRequest`] (JSON or [`RequestBuilder`])
//! - Run [`compose`] (or an [`Assembler`] wired to a [`SettingsLookup`])
//! - Persist or render the returned [`Timeline`]; inspect the [`Diagnostic`]s
//!
//! Composition is synchronous, stateless and deterministic.
#![forbid(unsafe_code)]

pub mod collab;
pub mod compose;
pub mod foundation;
pub mod request;
pub mod timeline;

pub use crate::collab::{
    CandidateRetriever, NoSettings, RetrievalFilters, SettingsLookup, StaticCatalog,
    StaticSettings, UserDefaults, collect_pool,
};
pub use crate::compose::assemble::{Assembler, Composed, compose};
pub use crate::compose::diagnostics::{
    CutawayDropReason, Diagnostic, DropReason, LeadPosition, log_diagnostics,
};
pub use crate::foundation::core::{Aspect, Canvas, DURATION_EPSILON, Fps, TimeSpan};
pub use crate::foundation::error::{FailureCategory, SplicerError, SplicerResult};
pub use crate::request::dsl::{RequestBuilder, audio_bed, candidate};
pub use crate::request::model::{
    AudioProposal, CandidateItem, CandidatePool, CompositionPlan, CompositionRequest,
    CutawayPlan, CutawayProposal, EventProposal, LeadRef, ProposedPayload, ProposedSegment,
    TrackProposals,
};
pub use crate::request::opts::ComposeOpts;
pub use crate::timeline::model::{
    AudioTrack, ContentRef, DurationSummary, EventPayload, Segment, SegmentRole, Timeline,
    TimelineMode, TrackEvent, TrackKind, Tracks, Transition, TransitionKind,
};
