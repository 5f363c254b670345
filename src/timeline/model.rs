use std::fmt;

use crate::{
    compose::overlap::{HasTransition, transition_overlap},
    foundation::core::{Canvas, DURATION_EPSILON, Fps, TimeSpan, approx_eq},
    foundation::error::{SplicerError, SplicerResult},
};

/// Tolerance for sums that are exact by construction (only float noise allowed).
const EXACT_EPSILON: f64 = 1e-6;

/// Reference to a content item, either from the shared library or owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ContentRef {
    /// Shared catalog item; at most one visual use per timeline.
    Library {
        /// Item identifier in the candidate pool.
        id: String,
    },
    /// Item supplied for this request only; may repeat.
    Owned {
        /// Item identifier in the caller-owned set.
        id: String,
    },
}

impl ContentRef {
    /// Library reference helper.
    pub fn library(id: impl Into<String>) -> Self {
        Self::Library { id: id.into() }
    }

    /// Caller-owned reference helper.
    pub fn owned(id: impl Into<String>) -> Self {
        Self::Owned { id: id.into() }
    }

    /// Raw item identifier.
    pub fn id(&self) -> &str {
        match self {
            Self::Library { id } | Self::Owned { id } => id,
        }
    }

    /// Return `true` for shared-library references.
    pub fn is_library(&self) -> bool {
        matches!(self, Self::Library { .. })
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library { id } => write!(f, "library:{id}"),
            Self::Owned { id } => write!(f, "owned:{id}"),
        }
    }
}

/// Transition styles understood by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Hard cut.
    None,
    Crossfade,
    Dissolve,
    FadeBlack,
    FadeWhite,
    WipeLeft,
    WipeRight,
    SlideLeft,
    SlideRight,
}

impl TransitionKind {
    /// Every transition except a hard cut shares footage of both neighbours.
    pub fn shortens_playback(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Outgoing transition from one segment into the next.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    pub kind: TransitionKind,
    /// Seconds shared with the following segment.
    pub duration: f64,
}

impl Transition {
    /// Playback time this transition consumes when it sits between two segments.
    pub fn overlap(&self) -> f64 {
        if self.kind.shortens_playback() {
            self.duration.max(0.0)
        } else {
            0.0
        }
    }
}

/// Classification of a segment. Cutaway-mode roles carry the slice of the original
/// continuous audio that plays under the picture.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentRole {
    /// Regular sequence-mode clip.
    Clip,
    /// Intro prepended to the core.
    LeadIn,
    /// Outro appended to the core.
    LeadOut,
    /// Speaker footage over its own audio.
    Primary {
        /// Absolute window on the source-audio timeline.
        source_audio: TimeSpan,
    },
    /// Library footage over the speaker's audio.
    Cutaway {
        /// Absolute window on the source-audio timeline.
        source_audio: TimeSpan,
    },
}

impl SegmentRole {
    /// Short name used for segment ids and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clip => "clip",
            Self::LeadIn => "lead_in",
            Self::LeadOut => "lead_out",
            Self::Primary { .. } => "primary",
            Self::Cutaway { .. } => "cutaway",
        }
    }

    /// Source-audio window for cutaway-mode roles.
    pub fn source_audio(self) -> Option<TimeSpan> {
        match self {
            Self::Primary { source_audio } | Self::Cutaway { source_audio } => Some(source_audio),
            Self::Clip | Self::LeadIn | Self::LeadOut => None,
        }
    }
}

/// One visual unit of the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// Stable id, `<role>-<index>`.
    pub id: String,
    pub content: ContentRef,
    /// Resolved source URL from the candidate pool.
    pub url: String,
    /// Trim window `[in, out)` inside the source.
    pub trim: TimeSpan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<Transition>,
    pub role: SegmentRole,
}

impl Segment {
    /// `out - in`.
    pub fn visible_duration(&self) -> f64 {
        self.trim.len()
    }
}

impl HasTransition for Segment {
    fn transition_out(&self) -> Option<&Transition> {
        self.transition_out.as_ref()
    }
}

/// Continuous audio bed (narration or music).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioTrack {
    pub content: ContentRef,
    pub url: String,
    /// Seconds from timeline start.
    pub offset: f64,
    pub duration: f64,
    /// Linear gain in `[0, 1]`.
    pub volume: f32,
    /// Renderer should loop the item to fill `duration`.
    #[serde(default)]
    pub looped: bool,
}

/// What a track event shows or plays.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    /// Resolved library or owned item.
    Content { content: ContentRef, url: String },
    /// Literal text (captions, text effects).
    Text { text: String },
}

/// Time-indexed event on a secondary track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackEvent {
    /// Seconds from timeline start.
    pub offset: f64,
    pub duration: f64,
    pub payload: EventPayload,
    /// Positional/visual parameters, passed through to the renderer untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl TrackEvent {
    /// Span occupied on the timeline.
    pub fn span(&self) -> TimeSpan {
        TimeSpan::at(self.offset, self.duration)
    }
}

/// Names of the secondary tracks, used in diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Narration,
    Music,
    SoundEffect,
    Overlay,
    TextEffect,
    Caption,
}

/// All secondary tracks of a timeline.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tracks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<AudioTrack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<AudioTrack>,
    #[serde(default)]
    pub sound_effects: Vec<TrackEvent>,
    #[serde(default)]
    pub overlays: Vec<TrackEvent>,
    #[serde(default)]
    pub text_effects: Vec<TrackEvent>,
    #[serde(default)]
    pub captions: Vec<TrackEvent>,
}

impl Tracks {
    /// Iterate every event list together with its track kind.
    pub fn event_lists(&self) -> [(TrackKind, &[TrackEvent]); 4] {
        [
            (TrackKind::SoundEffect, &self.sound_effects),
            (TrackKind::Overlay, &self.overlays),
            (TrackKind::TextEffect, &self.text_effects),
            (TrackKind::Caption, &self.captions),
        ]
    }

    /// Iterate both audio beds together with their track kind.
    pub fn audio_tracks(&self) -> [(TrackKind, Option<&AudioTrack>); 2] {
        [
            (TrackKind::Narration, self.narration.as_ref()),
            (TrackKind::Music, self.music.as_ref()),
        ]
    }
}

/// How the core of the timeline was built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineMode {
    /// Normalized sequence of clips.
    Sequence,
    /// Continuous speaker audio with cutaway visuals.
    Cutaway,
}

/// Duration bookkeeping, all in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DurationSummary {
    /// Requested duration of the core content.
    pub target: f64,
    /// `lead_in + core + lead_out`.
    pub total: f64,
    /// Effective duration of the core content.
    pub core: f64,
    pub lead_in: f64,
    pub lead_out: f64,
    /// Playback time consumed by interior transitions.
    pub transition_overlap: f64,
    /// `total` at the timeline frame rate.
    pub total_frames: u64,
}

/// Root output: everything a renderer needs to produce the final media.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Content-derived id, `tl-<hex>`.
    pub id: String,
    pub canvas: Canvas,
    pub fps: Fps,
    pub mode: TimelineMode,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub tracks: Tracks,
    pub durations: DurationSummary,
}

impl Timeline {
    /// Sum of visible durations minus interior transition overlap.
    pub fn effective_duration(&self) -> f64 {
        let visible: f64 = self.segments.iter().map(Segment::visible_duration).sum();
        visible - transition_overlap(&self.segments)
    }

    /// Check every structural invariant a renderer relies on.
    pub fn validate(&self) -> SplicerResult<()> {
        self.fps.validate()?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(SplicerError::validation("canvas width/height must be > 0"));
        }
        if self.segments.is_empty() {
            return Err(SplicerError::validation("timeline has no segments"));
        }

        for seg in &self.segments {
            if !seg.trim.start.is_finite() || !seg.trim.end.is_finite() || seg.trim.start < 0.0 {
                return Err(SplicerError::validation(format!(
                    "segment '{}' has an invalid trim window",
                    seg.id
                )));
            }
            if seg.visible_duration() <= 0.0 {
                return Err(SplicerError::validation(format!(
                    "segment '{}' has non-positive visible duration",
                    seg.id
                )));
            }
            if let Some(tr) = &seg.transition_out
                && (!tr.duration.is_finite() || tr.duration < 0.0)
            {
                return Err(SplicerError::validation(format!(
                    "segment '{}' has an invalid transition duration",
                    seg.id
                )));
            }
            if let Some(audio) = seg.role.source_audio() {
                if audio.is_empty() || audio.start < 0.0 {
                    return Err(SplicerError::validation(format!(
                        "segment '{}' has an invalid source audio window",
                        seg.id
                    )));
                }
                if seg.transition_out.is_some_and(|t| t.overlap() > 0.0) {
                    return Err(SplicerError::validation(format!(
                        "cutaway-mode segment '{}' must not carry a transition",
                        seg.id
                    )));
                }
            }
        }

        let d = &self.durations;
        if !approx_eq(d.total, d.lead_in + d.core + d.lead_out, EXACT_EPSILON) {
            return Err(SplicerError::validation(format!(
                "total {} != lead_in {} + core {} + lead_out {}",
                d.total, d.lead_in, d.core, d.lead_out
            )));
        }
        let effective = self.effective_duration();
        if !approx_eq(effective, d.total, DURATION_EPSILON) {
            return Err(SplicerError::validation(format!(
                "effective duration {effective} does not match total {}",
                d.total
            )));
        }

        for (kind, events) in self.tracks.event_lists() {
            for ev in events {
                check_placement(kind, ev.offset, ev.duration, d.total)?;
            }
        }
        for (kind, track) in self.tracks.audio_tracks() {
            let Some(track) = track else { continue };
            check_placement(kind, track.offset, track.duration, d.total)?;
            if !(0.0..=1.0).contains(&track.volume) {
                return Err(SplicerError::validation(format!(
                    "{kind:?} volume must be within [0, 1]"
                )));
            }
        }

        Ok(())
    }
}

fn check_placement(kind: TrackKind, offset: f64, duration: f64, total: f64) -> SplicerResult<()> {
    if !offset.is_finite() || !duration.is_finite() || duration < 0.0 {
        return Err(SplicerError::validation(format!(
            "{kind:?} event has a non-finite or negative placement"
        )));
    }
    if offset < 0.0 || offset > total + EXACT_EPSILON {
        return Err(SplicerError::validation(format!(
            "{kind:?} event offset {offset} outside [0, {total}]"
        )));
    }
    if offset + duration > total + DURATION_EPSILON {
        return Err(SplicerError::validation(format!(
            "{kind:?} event at {offset} overruns timeline end {total}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
