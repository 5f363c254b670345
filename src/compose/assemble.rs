use crate::{
    collab::{NoSettings, SettingsLookup},
    compose::diagnostics::{Diagnostic, LeadPosition, log_diagnostics},
    compose::interleave::{Insertion, Recording, filter_insertions, interleave},
    compose::normalize::normalize_durations,
    compose::offset::{fit_tracks_to_core, propagate_offsets},
    compose::overlap::transition_overlap,
    compose::resolve::{Resolver, check_trim},
    foundation::core::{TimeSpan, approx_eq},
    foundation::error::{SplicerError, SplicerResult},
    request::model::{CompositionPlan, CompositionRequest, CutawayPlan, LeadRef, ProposedSegment},
    request::opts::ComposeOpts,
    timeline::fingerprint::timeline_id,
    timeline::model::{DurationSummary, Segment, SegmentRole, Timeline, TimelineMode},
};

/// A composed timeline plus everything that was healed along the way.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Composed {
    pub timeline: Timeline,
    pub diagnostics: Vec<Diagnostic>,
}

impl Composed {
    /// Emit the diagnostics as `tracing` events.
    pub fn log_diagnostics(&self) {
        log_diagnostics(&self.diagnostics);
    }
}

struct Core {
    segments: Vec<Segment>,
    mode: TimelineMode,
    /// Effective core duration.
    duration: f64,
    overlap: f64,
}

/// Orchestrates resolution, normalization or interleaving, and offset propagation for one
/// request at a time. Holds no per-request state.
pub struct Assembler<'s> {
    settings: &'s dyn SettingsLookup,
}

impl Default for Assembler<'static> {
    fn default() -> Self {
        Self {
            settings: &NoSettings,
        }
    }
}

impl<'s> Assembler<'s> {
    /// Assembler consulting `settings` for lead-in/lead-out defaults.
    pub fn new(settings: &'s dyn SettingsLookup) -> Self {
        Self { settings }
    }

    /// Compose `req` into a validated timeline.
    ///
    /// Fails only when the request is unusable (bad target, empty pool, malformed values)
    /// or when nothing renderable survives resolution.
    #[tracing::instrument(skip_all, fields(user = req.user_id.as_deref().unwrap_or("-")))]
    pub fn assemble(&self, req: &CompositionRequest) -> SplicerResult<Composed> {
        req.validate()?;
        let target = req.target()?;
        let opts = &req.opts;
        let mut diags = Vec::new();

        let (lead_in_ref, lead_out_ref) = self.lead_refs(req, &mut diags);
        let mut resolver = Resolver::new(&req.pool);

        let lead_in = lead_in_ref.and_then(|l| {
            build_lead(&mut resolver, &l, LeadPosition::LeadIn, &mut diags)
        });
        let mut core = match &req.plan {
            CompositionPlan::Sequence { segments } => {
                sequence_core(&mut resolver, segments, target, opts, &mut diags)?
            }
            CompositionPlan::Cutaway(plan) => {
                cutaway_core(&mut resolver, plan, target, opts, &mut diags)?
            }
        };
        let lead_out = lead_out_ref.and_then(|l| {
            build_lead(&mut resolver, &l, LeadPosition::LeadOut, &mut diags)
        });

        // Whatever follows the core joins with a hard cut.
        if let Some(last) = core.segments.last_mut() {
            last.transition_out = None;
        }

        let tracks = resolver.resolve_tracks(&req.tracks, &mut diags);
        let tracks = fit_tracks_to_core(tracks, core.duration, &mut diags);
        let mut placed = propagate_offsets(core.segments, core.duration, lead_in, lead_out, tracks);
        assign_ids(&mut placed.segments);

        let mut timeline = Timeline {
            id: String::new(),
            canvas: req.resolved_canvas(),
            fps: req.fps,
            mode: core.mode,
            segments: placed.segments,
            tracks: placed.tracks,
            durations: DurationSummary {
                target,
                total: placed.total,
                core: placed.core,
                lead_in: placed.lead_in,
                lead_out: placed.lead_out,
                transition_overlap: core.overlap,
                total_frames: req.fps.secs_to_frames_round(placed.total),
            },
        };
        timeline.id = timeline_id(&timeline);
        timeline.validate()?;

        tracing::debug!(
            id = %timeline.id,
            segments = timeline.segments.len(),
            total = timeline.durations.total,
            diagnostics = diags.len(),
            "timeline composed"
        );
        Ok(Composed {
            timeline,
            diagnostics: diags,
        })
    }

    /// Explicit leads win; missing ones fall back to the user's defaults. A failing lookup
    /// only costs the leads.
    fn lead_refs(
        &self,
        req: &CompositionRequest,
        diags: &mut Vec<Diagnostic>,
    ) -> (Option<LeadRef>, Option<LeadRef>) {
        let mut lead_in = req.lead_in.clone();
        let mut lead_out = req.lead_out.clone();
        let Some(user_id) = req.user_id.as_deref() else {
            return (lead_in, lead_out);
        };
        if lead_in.is_some() && lead_out.is_some() {
            return (lead_in, lead_out);
        }

        match self.settings.user_defaults(user_id) {
            Ok(Some(defaults)) => {
                lead_in = lead_in.or(defaults.lead_in);
                lead_out = lead_out.or(defaults.lead_out);
            }
            Ok(None) => {}
            Err(e) => diags.push(Diagnostic::SettingsUnavailable {
                user_id: user_id.to_owned(),
                reason: format!("{e:#}"),
            }),
        }
        (lead_in, lead_out)
    }
}

/// Compose with no settings collaborator.
pub fn compose(req: &CompositionRequest) -> SplicerResult<Composed> {
    Assembler::default().assemble(req)
}

fn build_lead(
    resolver: &mut Resolver<'_>,
    lead: &LeadRef,
    position: LeadPosition,
    diags: &mut Vec<Diagnostic>,
) -> Option<Segment> {
    let item = resolver.claim(&lead.content, diags)?;
    let duration = lead.duration.unwrap_or(item.duration);
    if duration <= 0.0 {
        diags.push(Diagnostic::LeadUnavailable {
            position,
            content: lead.content.clone(),
        });
        return None;
    }
    let role = match position {
        LeadPosition::LeadIn => SegmentRole::LeadIn,
        LeadPosition::LeadOut => SegmentRole::LeadOut,
    };
    Some(Segment {
        id: String::new(),
        content: lead.content.clone(),
        url: item.url.clone(),
        trim: TimeSpan::at(0.0, duration),
        transition_out: None,
        role,
    })
}

fn sequence_core(
    resolver: &mut Resolver<'_>,
    proposals: &[ProposedSegment],
    target: f64,
    opts: &ComposeOpts,
    diags: &mut Vec<Diagnostic>,
) -> SplicerResult<Core> {
    let resolved = resolver.resolve_segments(proposals, diags);
    if resolved.is_empty() {
        return Err(SplicerError::no_content(format!(
            "none of {} proposed segments resolved",
            proposals.len()
        )));
    }

    let normalized = normalize_durations(resolved, target, opts, diags);
    let overlap = transition_overlap(&normalized);

    let mut segments = Vec::with_capacity(normalized.len());
    for p in normalized {
        let item = resolver.lookup(&p.content).ok_or_else(|| {
            SplicerError::validation(format!("resolved reference '{}' vanished", p.content))
        })?;
        let seg = Segment {
            id: String::new(),
            content: p.content,
            url: item.url.clone(),
            trim: TimeSpan::at(p.trim_start, p.duration),
            transition_out: p.transition_out,
            role: SegmentRole::Clip,
        };
        check_trim(&seg, item, opts.epsilon, diags);
        segments.push(seg);
    }

    let visible: f64 = segments.iter().map(Segment::visible_duration).sum();
    Ok(Core {
        segments,
        mode: TimelineMode::Sequence,
        duration: visible - overlap,
        overlap,
    })
}

fn cutaway_core(
    resolver: &mut Resolver<'_>,
    plan: &CutawayPlan,
    target: f64,
    opts: &ComposeOpts,
    diags: &mut Vec<Diagnostic>,
) -> SplicerResult<Core> {
    let recordings: Vec<Recording> = plan
        .speakers
        .iter()
        .filter_map(|content| {
            let item = resolver.claim(content, diags)?;
            Some(Recording {
                content: content.clone(),
                url: item.url.clone(),
                duration: item.duration,
            })
        })
        .collect();

    let available: f64 = recordings.iter().map(|r| r.duration).sum();
    let source_duration = match plan.source_duration {
        Some(requested) if !approx_eq(requested, available, opts.epsilon) => {
            diags.push(Diagnostic::SourceDurationAdjusted {
                requested,
                available,
            });
            requested.min(available)
        }
        Some(requested) => requested,
        None => available,
    };
    if recordings.is_empty() || source_duration <= 0.0 {
        return Err(SplicerError::no_content(
            "no speaker recording resolved for cutaway composition",
        ));
    }
    if !approx_eq(source_duration, target, opts.epsilon) {
        diags.push(Diagnostic::TargetOverridden {
            target,
            actual: source_duration,
        });
    }

    // Unknown cutaways go first; duplicates are only rejected among placeable ones, since
    // dropping a placed cutaway can only widen the gaps around it.
    let candidates: Vec<Insertion> = plan
        .insertions
        .iter()
        .filter_map(|p| {
            let item = resolver.resolve(&p.content, diags)?;
            Some(Insertion {
                start: p.start,
                duration: p.duration,
                content: p.content.clone(),
                url: item.url.clone(),
                item_duration: item.duration,
            })
        })
        .collect();
    let placeable = filter_insertions(candidates, source_duration, opts, diags);
    let insertions: Vec<Insertion> = placeable
        .into_iter()
        .filter(|ins| resolver.claim(&ins.content, diags).is_some())
        .collect();

    Ok(Core {
        segments: interleave(&recordings, source_duration, &insertions),
        mode: TimelineMode::Cutaway,
        duration: source_duration,
        overlap: 0.0,
    })
}

fn assign_ids(segments: &mut [Segment]) {
    for (i, seg) in segments.iter_mut().enumerate() {
        seg.id = format!("{}-{i}", seg.role.name());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/assemble.rs"]
mod tests;
