use crate::timeline::model::{ContentRef, TrackKind};

/// Why a content reference was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Not in the library pool nor in the caller-owned set.
    Unknown,
    /// Library item already used earlier in this timeline.
    Duplicate,
}

/// Why a cutaway proposal was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutawayDropReason {
    /// Shorter than the minimum cutaway duration.
    TooShort,
    /// Starts before the previous cutaway's end plus the minimum gap.
    TooClose,
    /// Starts before 0 or at/after the end of the source audio.
    OutOfRange,
}

/// Which end of the core a lead segment sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadPosition {
    LeadIn,
    LeadOut,
}

/// Structured, non-fatal event produced while composing.
///
/// Stages append these to a caller-provided list instead of logging, which keeps them free of
/// side effects. [`log_diagnostics`] turns them into `tracing` events at the boundary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    ReferenceDropped {
        content: ContentRef,
        reason: DropReason,
    },
    /// The trim window reads past the item's known length; kept as-is.
    TrimExceedsSource {
        content: ContentRef,
        trim_end: f64,
        source_duration: f64,
    },
    DurationsScaled {
        from: f64,
        to: f64,
    },
    /// Segment pinned at the minimum visible duration.
    SegmentClamped {
        index: usize,
        proposed: f64,
        clamped: f64,
    },
    /// Rounding residue moved onto the tail segments.
    ResidualApplied {
        amount: f64,
    },
    /// Final guard adjusted the tail segments.
    ForcedResidual {
        amount: f64,
    },
    /// Minimum durations kept the effective duration away from the target.
    TargetUnreachable {
        effective: f64,
        target: f64,
    },
    CutawayDropped {
        start: f64,
        duration: f64,
        reason: CutawayDropReason,
    },
    /// Cutaway cut short by its item length or by the end of the source audio.
    CutawayShortened {
        start: f64,
        from: f64,
        to: f64,
    },
    /// Cutaway-mode core length follows the source audio, not the requested target.
    TargetOverridden {
        target: f64,
        actual: f64,
    },
    /// Requested source duration disagrees with the resolved recordings.
    SourceDurationAdjusted {
        requested: f64,
        available: f64,
    },
    SettingsUnavailable {
        user_id: String,
        reason: String,
    },
    LeadUnavailable {
        position: LeadPosition,
        content: ContentRef,
    },
    TrackEventDropped {
        track: TrackKind,
        offset: f64,
    },
    TrackEventTrimmed {
        track: TrackKind,
        offset: f64,
        from: f64,
        to: f64,
    },
}

impl Diagnostic {
    /// `true` for events a caller should look at; `false` for routine arithmetic.
    pub fn is_warning(&self) -> bool {
        !matches!(
            self,
            Self::DurationsScaled { .. }
                | Self::ResidualApplied { .. }
                | Self::ForcedResidual { .. }
                | Self::CutawayShortened { .. }
                | Self::TrackEventTrimmed { .. }
        )
    }
}

/// Emit every diagnostic as a `tracing` event.
pub fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        let json = serde_json::to_string(d).unwrap_or_else(|_| format!("{d:?}"));
        if d.is_warning() {
            tracing::warn!(diagnostic = %json, "composition diagnostic");
        } else {
            tracing::debug!(diagnostic = %json, "composition diagnostic");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/diagnostics.rs"]
mod tests;
