use std::collections::{BTreeMap, BTreeSet};

use crate::{
    compose::diagnostics::{Diagnostic, DropReason},
    request::model::{
        AudioProposal, CandidateItem, CandidatePool, EventProposal, ProposedPayload,
        ProposedSegment, TrackProposals,
    },
    timeline::model::{AudioTrack, ContentRef, EventPayload, Segment, TrackEvent, Tracks},
};

/// Checks references against the candidate pool and enforces single use of library items.
///
/// One resolver lives for exactly one composition request; claims made for the lead-in are
/// visible to the core and the lead-out. The upstream selection strategy that produced a
/// reference plays no role here.
pub struct Resolver<'a> {
    library: BTreeMap<&'a str, &'a CandidateItem>,
    owned: BTreeMap<&'a str, &'a CandidateItem>,
    claimed: BTreeSet<&'a str>,
}

impl<'a> Resolver<'a> {
    /// Index `pool`. The first item wins when an id is listed twice.
    pub fn new(pool: &'a CandidatePool) -> Self {
        fn index(items: &[CandidateItem]) -> BTreeMap<&str, &CandidateItem> {
            let mut map = BTreeMap::new();
            for item in items {
                map.entry(item.id.as_str()).or_insert(item);
            }
            map
        }

        Self {
            library: index(&pool.library),
            owned: index(&pool.owned),
            claimed: BTreeSet::new(),
        }
    }

    /// Pool item behind `content`, without recording anything.
    pub fn lookup(&self, content: &ContentRef) -> Option<&'a CandidateItem> {
        match content {
            ContentRef::Library { id } => self.library.get(id.as_str()).copied(),
            ContentRef::Owned { id } => self.owned.get(id.as_str()).copied(),
        }
    }

    /// Existence check only; unknown references are recorded as dropped.
    pub fn resolve(
        &self,
        content: &ContentRef,
        diags: &mut Vec<Diagnostic>,
    ) -> Option<&'a CandidateItem> {
        let item = self.lookup(content);
        if item.is_none() {
            diags.push(Diagnostic::ReferenceDropped {
                content: content.clone(),
                reason: DropReason::Unknown,
            });
        }
        item
    }

    /// Existence check plus single use: a library item resolves only the first time it is
    /// claimed. Owned items may be claimed any number of times.
    pub fn claim(
        &mut self,
        content: &ContentRef,
        diags: &mut Vec<Diagnostic>,
    ) -> Option<&'a CandidateItem> {
        let item = self.resolve(content, diags)?;
        if content.is_library() && !self.claimed.insert(item.id.as_str()) {
            diags.push(Diagnostic::ReferenceDropped {
                content: content.clone(),
                reason: DropReason::Duplicate,
            });
            return None;
        }
        Some(item)
    }

    /// Keep the proposals whose references can be claimed, in input order.
    pub fn resolve_segments(
        &mut self,
        proposals: &[ProposedSegment],
        diags: &mut Vec<Diagnostic>,
    ) -> Vec<ProposedSegment> {
        proposals
            .iter()
            .filter(|p| self.claim(&p.content, diags).is_some())
            .cloned()
            .collect()
    }

    /// Resolve secondary-track proposals into core-relative tracks.
    ///
    /// Audio beds get their item length as duration; fitting them to the core happens
    /// later. Track references are not deduplicated.
    pub fn resolve_tracks(&self, proposals: &TrackProposals, diags: &mut Vec<Diagnostic>) -> Tracks {
        let audio = |p: &Option<AudioProposal>, diags: &mut Vec<Diagnostic>| -> Option<AudioTrack> {
            let p = p.as_ref()?;
            let item = self.resolve(&p.content, diags)?;
            Some(AudioTrack {
                content: p.content.clone(),
                url: item.url.clone(),
                offset: p.offset,
                duration: item.duration,
                volume: p.volume.clamp(0.0, 1.0),
                looped: false,
            })
        };
        let events = |list: &[EventProposal], diags: &mut Vec<Diagnostic>| -> Vec<TrackEvent> {
            list.iter()
                .filter_map(|ev| self.resolve_event(ev, diags))
                .collect()
        };

        Tracks {
            narration: audio(&proposals.narration, diags),
            music: audio(&proposals.music, diags),
            sound_effects: events(&proposals.sound_effects, diags),
            overlays: events(&proposals.overlays, diags),
            text_effects: events(&proposals.text_effects, diags),
            captions: events(&proposals.captions, diags),
        }
    }

    fn resolve_event(&self, ev: &EventProposal, diags: &mut Vec<Diagnostic>) -> Option<TrackEvent> {
        let payload = match &ev.payload {
            ProposedPayload::Content { content } => {
                let item = self.resolve(content, diags)?;
                EventPayload::Content {
                    content: content.clone(),
                    url: item.url.clone(),
                }
            }
            ProposedPayload::Text { text } => EventPayload::Text { text: text.clone() },
        };
        Some(TrackEvent {
            offset: ev.offset,
            duration: ev.duration,
            payload,
            params: ev.params.clone(),
        })
    }
}

/// Record a [`Diagnostic::TrimExceedsSource`] when `seg` reads past its item's length.
pub fn check_trim(seg: &Segment, item: &CandidateItem, eps: f64, diags: &mut Vec<Diagnostic>) {
    if seg.trim.end > item.duration + eps {
        diags.push(Diagnostic::TrimExceedsSource {
            content: seg.content.clone(),
            trim_end: seg.trim.end,
            source_duration: item.duration,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/resolve.rs"]
mod tests;
