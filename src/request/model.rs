use crate::{
    compose::overlap::HasTransition,
    foundation::core::{Aspect, Canvas, Fps},
    foundation::error::{SplicerError, SplicerResult},
    request::opts::ComposeOpts,
    timeline::model::{ContentRef, Transition},
};

/// One item offered by an upstream selection collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandidateItem {
    pub id: String,
    /// Known source duration in seconds.
    pub duration: f64,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request-scoped content the composition may draw from. Never mutated.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandidatePool {
    /// Shared catalog items.
    #[serde(default)]
    pub library: Vec<CandidateItem>,
    /// Items supplied by the caller for this request.
    #[serde(default)]
    pub owned: Vec<CandidateItem>,
}

impl CandidatePool {
    /// Return `true` when neither library nor owned items exist.
    pub fn is_empty(&self) -> bool {
        self.library.is_empty() && self.owned.is_empty()
    }
}

/// Proposed sequence-mode segment, before normalization.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProposedSegment {
    pub content: ContentRef,
    /// Proposed visible duration in seconds.
    pub duration: f64,
    /// Trim-in point inside the source.
    #[serde(default)]
    pub trim_start: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_out: Option<Transition>,
}

impl ProposedSegment {
    /// Segment without transition starting at the head of its source.
    pub fn new(content: ContentRef, duration: f64) -> Self {
        Self {
            content,
            duration,
            trim_start: 0.0,
            transition_out: None,
        }
    }

    /// Set the outgoing transition.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition_out = Some(transition);
        self
    }

    /// Set the trim-in point.
    pub fn with_trim_start(mut self, trim_start: f64) -> Self {
        self.trim_start = trim_start;
        self
    }
}

impl HasTransition for ProposedSegment {
    fn transition_out(&self) -> Option<&Transition> {
        self.transition_out.as_ref()
    }
}

/// Proposed cutaway over the continuous source audio.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CutawayProposal {
    /// Absolute start on the source-audio timeline.
    pub start: f64,
    pub duration: f64,
    pub content: ContentRef,
}

/// Continuous narration with cutaway visuals.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CutawayPlan {
    /// Speaker recordings, concatenated in order into one audio timeline.
    pub speakers: Vec<ContentRef>,
    /// Expected length of the concatenated recordings, if the caller knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_duration: Option<f64>,
    #[serde(default)]
    pub insertions: Vec<CutawayProposal>,
}

/// How the core of the timeline is built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompositionPlan {
    /// Proposed clips normalized to the target duration.
    Sequence { segments: Vec<ProposedSegment> },
    /// Speaker audio kept intact with cutaways interleaved.
    Cutaway(CutawayPlan),
}

/// Optional intro/outro content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LeadRef {
    pub content: ContentRef,
    /// Overrides the pool duration when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl LeadRef {
    /// Lead using the pool duration of `content`.
    pub fn new(content: ContentRef) -> Self {
        Self {
            content,
            duration: None,
        }
    }
}

fn default_volume() -> f32 {
    1.0
}

/// Proposed narration or music bed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioProposal {
    pub content: ContentRef,
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Core-relative start.
    #[serde(default)]
    pub offset: f64,
}

/// Payload of a proposed track event.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProposedPayload {
    Content { content: ContentRef },
    Text { text: String },
}

/// Proposed sound effect, overlay, text effect or caption cue.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventProposal {
    /// Core-relative start.
    pub offset: f64,
    pub duration: f64,
    pub payload: ProposedPayload,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl EventProposal {
    /// Text event (caption cue or text effect).
    pub fn text(offset: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            offset,
            duration,
            payload: ProposedPayload::Text { text: text.into() },
            params: serde_json::Value::Null,
        }
    }

    /// Content event (sound effect or overlay).
    pub fn content(offset: f64, duration: f64, content: ContentRef) -> Self {
        Self {
            offset,
            duration,
            payload: ProposedPayload::Content { content },
            params: serde_json::Value::Null,
        }
    }

    /// Attach renderer parameters.
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// Secondary track proposals, timed relative to the core start.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackProposals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<AudioProposal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<AudioProposal>,
    #[serde(default)]
    pub captions: Vec<EventProposal>,
    #[serde(default)]
    pub sound_effects: Vec<EventProposal>,
    #[serde(default)]
    pub overlays: Vec<EventProposal>,
    #[serde(default)]
    pub text_effects: Vec<EventProposal>,
}

/// Everything one composition needs. Stateless: nothing survives the call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompositionRequest {
    /// Target duration of the core content, seconds.
    #[serde(default)]
    pub target_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
    /// Explicit size; wins over `aspect`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    #[serde(default)]
    pub fps: Fps,
    #[serde(default)]
    pub pool: CandidatePool,
    pub plan: CompositionPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<LeadRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_out: Option<LeadRef>,
    /// Used for the lead-in/lead-out settings lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub tracks: TrackProposals,
    #[serde(default)]
    pub opts: ComposeOpts,
}

impl CompositionRequest {
    /// Output canvas: explicit size, else the aspect's default, else landscape.
    pub fn resolved_canvas(&self) -> Canvas {
        self.canvas
            .or_else(|| self.aspect.map(Aspect::canvas))
            .unwrap_or_default()
    }

    /// The validated target duration.
    pub fn target(&self) -> SplicerResult<f64> {
        match self.target_duration {
            None => Err(SplicerError::invalid_target("target duration is required")),
            Some(t) if !t.is_finite() || t <= 0.0 => Err(SplicerError::invalid_target(format!(
                "target duration must be finite and > 0, got {t}"
            ))),
            Some(t) => Ok(t),
        }
    }

    /// Reject requests that cannot start composing. Reference problems are not checked
    /// here; the resolver drops those and keeps going.
    pub fn validate(&self) -> SplicerResult<()> {
        self.target()?;
        if self.pool.is_empty() {
            return Err(SplicerError::EmptyPool);
        }
        self.fps.validate()?;
        let canvas = self.resolved_canvas();
        if canvas.width == 0 || canvas.height == 0 {
            return Err(SplicerError::validation("canvas width/height must be > 0"));
        }
        self.opts.validate()?;

        for item in self.pool.library.iter().chain(&self.pool.owned) {
            if item.id.trim().is_empty() {
                return Err(SplicerError::validation("candidate id must be non-empty"));
            }
            check_non_negative(&format!("candidate '{}' duration", item.id), item.duration)?;
        }

        match &self.plan {
            CompositionPlan::Sequence { segments } => {
                for (i, seg) in segments.iter().enumerate() {
                    check_non_negative(&format!("segment {i} duration"), seg.duration)?;
                    check_non_negative(&format!("segment {i} trim_start"), seg.trim_start)?;
                    if let Some(tr) = &seg.transition_out {
                        check_non_negative(&format!("segment {i} transition"), tr.duration)?;
                    }
                }
            }
            CompositionPlan::Cutaway(plan) => {
                if let Some(d) = plan.source_duration {
                    check_non_negative("source_duration", d)?;
                }
                for (i, ins) in plan.insertions.iter().enumerate() {
                    if !ins.start.is_finite() {
                        return Err(SplicerError::validation(format!(
                            "insertion {i} start must be finite"
                        )));
                    }
                    check_non_negative(&format!("insertion {i} duration"), ins.duration)?;
                }
            }
        }

        for lead in [&self.lead_in, &self.lead_out].into_iter().flatten() {
            if let Some(d) = lead.duration {
                check_non_negative(&format!("lead '{}' duration", lead.content), d)?;
            }
        }

        let t = &self.tracks;
        for audio in [&t.narration, &t.music].into_iter().flatten() {
            if !audio.volume.is_finite() || audio.volume < 0.0 {
                return Err(SplicerError::validation(format!(
                    "volume of '{}' must be finite and >= 0",
                    audio.content
                )));
            }
            if !audio.offset.is_finite() {
                return Err(SplicerError::validation(format!(
                    "offset of '{}' must be finite",
                    audio.content
                )));
            }
        }
        for ev in t
            .captions
            .iter()
            .chain(&t.sound_effects)
            .chain(&t.overlays)
            .chain(&t.text_effects)
        {
            if !ev.offset.is_finite() {
                return Err(SplicerError::validation("event offset must be finite"));
            }
            check_non_negative("event duration", ev.duration)?;
        }

        Ok(())
    }
}

fn check_non_negative(what: &str, v: f64) -> SplicerResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(SplicerError::validation(format!(
            "{what} must be finite and >= 0, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/request/model.rs"]
mod tests;
