use std::collections::BTreeSet;

use crate::{
    foundation::core::{Aspect, Canvas, Fps},
    foundation::error::{SplicerError, SplicerResult},
    request::model::{
        AudioProposal, CandidateItem, CandidatePool, CompositionPlan, CompositionRequest,
        CutawayPlan, CutawayProposal, EventProposal, LeadRef, ProposedSegment, TrackProposals,
    },
    request::opts::ComposeOpts,
    timeline::model::ContentRef,
};

/// Builder for [`CompositionRequest`](crate::CompositionRequest).
///
/// Adding a segment selects sequence mode; adding a speaker selects cutaway mode. Mixing both
/// is rejected by [`RequestBuilder::build`].
pub struct RequestBuilder {
    target_duration: f64,
    aspect: Option<Aspect>,
    canvas: Option<Canvas>,
    fps: Fps,
    pool: CandidatePool,
    pool_ids: BTreeSet<(bool, String)>,
    segments: Vec<ProposedSegment>,
    cutaway: Option<CutawayPlan>,
    lead_in: Option<LeadRef>,
    lead_out: Option<LeadRef>,
    user_id: Option<String>,
    tracks: TrackProposals,
    opts: ComposeOpts,
}

impl RequestBuilder {
    /// Create a builder for a request targeting `target_duration` seconds of core content.
    pub fn new(target_duration: f64) -> Self {
        Self {
            target_duration,
            aspect: None,
            canvas: None,
            fps: Fps::default(),
            pool: CandidatePool::default(),
            pool_ids: BTreeSet::new(),
            segments: Vec::new(),
            cutaway: None,
            lead_in: None,
            lead_out: None,
            user_id: None,
            tracks: TrackProposals::default(),
            opts: ComposeOpts::default(),
        }
    }

    /// Set the output aspect.
    pub fn aspect(mut self, aspect: Aspect) -> Self {
        self.aspect = Some(aspect);
        self
    }

    /// Set an explicit canvas; wins over the aspect.
    pub fn canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn fps(mut self, fps: Fps) -> Self {
        self.fps = fps;
        self
    }

    /// Override pipeline constants.
    pub fn opts(mut self, opts: ComposeOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Add a shared-library candidate under a unique id.
    pub fn library_item(mut self, item: CandidateItem) -> SplicerResult<Self> {
        self.claim_id(true, &item.id)?;
        self.pool.library.push(item);
        Ok(self)
    }

    /// Add a caller-owned candidate under a unique id.
    pub fn owned_item(mut self, item: CandidateItem) -> SplicerResult<Self> {
        self.claim_id(false, &item.id)?;
        self.pool.owned.push(item);
        Ok(self)
    }

    fn claim_id(&mut self, library: bool, id: &str) -> SplicerResult<()> {
        if !self.pool_ids.insert((library, id.to_owned())) {
            let side = if library { "library" } else { "owned" };
            return Err(SplicerError::validation(format!(
                "duplicate {side} candidate '{id}'"
            )));
        }
        Ok(())
    }

    /// Append a proposed sequence-mode segment.
    pub fn segment(mut self, segment: ProposedSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Append a speaker recording to the cutaway source audio.
    pub fn speaker(mut self, content: ContentRef) -> Self {
        self.cutaway_plan().speakers.push(content);
        self
    }

    /// Declare the expected source-audio length.
    pub fn source_duration(mut self, secs: f64) -> Self {
        self.cutaway_plan().source_duration = Some(secs);
        self
    }

    /// Propose a cutaway at an absolute source-audio time.
    pub fn cutaway(mut self, start: f64, duration: f64, content: ContentRef) -> Self {
        self.cutaway_plan().insertions.push(CutawayProposal {
            start,
            duration,
            content,
        });
        self
    }

    fn cutaway_plan(&mut self) -> &mut CutawayPlan {
        self.cutaway.get_or_insert_with(|| CutawayPlan {
            speakers: Vec::new(),
            source_duration: None,
            insertions: Vec::new(),
        })
    }

    pub fn lead_in(mut self, lead: LeadRef) -> Self {
        self.lead_in = Some(lead);
        self
    }

    pub fn lead_out(mut self, lead: LeadRef) -> Self {
        self.lead_out = Some(lead);
        self
    }

    /// User whose stored defaults fill missing leads.
    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the narration bed.
    pub fn narration(mut self, audio: AudioProposal) -> Self {
        self.tracks.narration = Some(audio);
        self
    }

    /// Set the music bed.
    pub fn music(mut self, audio: AudioProposal) -> Self {
        self.tracks.music = Some(audio);
        self
    }

    pub fn caption(mut self, cue: EventProposal) -> Self {
        self.tracks.captions.push(cue);
        self
    }

    pub fn sound_effect(mut self, event: EventProposal) -> Self {
        self.tracks.sound_effects.push(event);
        self
    }

    pub fn overlay(mut self, event: EventProposal) -> Self {
        self.tracks.overlays.push(event);
        self
    }

    pub fn text_effect(mut self, event: EventProposal) -> Self {
        self.tracks.text_effects.push(event);
        self
    }

    /// Build and validate the final [`CompositionRequest`](crate::CompositionRequest).
    pub fn build(self) -> SplicerResult<CompositionRequest> {
        let plan = match (self.cutaway, self.segments.is_empty()) {
            (Some(_), false) => {
                return Err(SplicerError::validation(
                    "request mixes sequence segments with cutaway speakers",
                ));
            }
            (Some(plan), true) => {
                if plan.speakers.is_empty() {
                    return Err(SplicerError::validation(
                        "cutaway request needs at least one speaker",
                    ));
                }
                CompositionPlan::Cutaway(plan)
            }
            (None, _) => CompositionPlan::Sequence {
                segments: self.segments,
            },
        };

        let req = CompositionRequest {
            target_duration: Some(self.target_duration),
            aspect: self.aspect,
            canvas: self.canvas,
            fps: self.fps,
            pool: self.pool,
            plan,
            lead_in: self.lead_in,
            lead_out: self.lead_out,
            user_id: self.user_id,
            tracks: self.tracks,
            opts: self.opts,
        };
        req.validate()?;
        Ok(req)
    }
}

/// Create a candidate item without tags.
pub fn candidate(id: impl Into<String>, duration: f64, url: impl Into<String>) -> CandidateItem {
    CandidateItem {
        id: id.into(),
        duration,
        url: url.into(),
        tags: Vec::new(),
    }
}

/// Audio bed starting at the core start with full volume.
pub fn audio_bed(content: ContentRef) -> AudioProposal {
    AudioProposal {
        content,
        volume: 1.0,
        offset: 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/dsl.rs"]
mod tests;
