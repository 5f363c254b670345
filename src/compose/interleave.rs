use crate::{
    compose::diagnostics::{CutawayDropReason, Diagnostic},
    foundation::core::TimeSpan,
    request::opts::ComposeOpts,
    timeline::model::{ContentRef, Segment, SegmentRole},
};

/// One speaker recording, placed end to end with the others on the source-audio timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    pub content: ContentRef,
    pub url: String,
    pub duration: f64,
}

/// Resolved cutaway proposal.
#[derive(Clone, Debug, PartialEq)]
pub struct Insertion {
    /// Absolute start on the source-audio timeline.
    pub start: f64,
    pub duration: f64,
    pub content: ContentRef,
    pub url: String,
    /// Known length of the cutaway item.
    pub item_duration: f64,
}

/// Keep the insertions that can actually be placed, in start order.
///
/// Insertions are cut to their item length and to the end of the audio, then dropped when
/// shorter than `opts.min_cutaway_duration`, or when they start before the previous kept
/// insertion's end plus `opts.min_cutaway_gap`.
pub fn filter_insertions(
    mut insertions: Vec<Insertion>,
    source_duration: f64,
    opts: &ComposeOpts,
    diags: &mut Vec<Diagnostic>,
) -> Vec<Insertion> {
    insertions.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut kept = Vec::with_capacity(insertions.len());
    let mut prev_end: Option<f64> = None;
    for mut ins in insertions {
        let dropped = |reason| Diagnostic::CutawayDropped {
            start: ins.start,
            duration: ins.duration,
            reason,
        };

        if ins.start < 0.0 || ins.start >= source_duration {
            diags.push(dropped(CutawayDropReason::OutOfRange));
            continue;
        }

        let fitted = ins
            .duration
            .min(ins.item_duration)
            .min(source_duration - ins.start);
        if fitted < opts.min_cutaway_duration {
            diags.push(dropped(CutawayDropReason::TooShort));
            continue;
        }
        if let Some(end) = prev_end
            && ins.start < end + opts.min_cutaway_gap
        {
            diags.push(dropped(CutawayDropReason::TooClose));
            continue;
        }

        if fitted < ins.duration {
            diags.push(Diagnostic::CutawayShortened {
                start: ins.start,
                from: ins.duration,
                to: fitted,
            });
            ins.duration = fitted;
        }
        prev_end = Some(ins.start + ins.duration);
        kept.push(ins);
    }
    kept
}

/// Walk the source audio from 0 to `source_duration`, emitting primary speaker footage
/// between the (already filtered, start-ordered) insertions and cutaway footage over them.
///
/// Every emitted segment carries its absolute `source_audio` window. The windows tile
/// `[0, source_duration)` without gaps, so the audio timeline keeps its length. No segment
/// gets a transition.
pub fn interleave(
    recordings: &[Recording],
    source_duration: f64,
    insertions: &[Insertion],
) -> Vec<Segment> {
    let mut out = Vec::with_capacity(insertions.len() * 2 + recordings.len());
    let mut cursor = 0.0;

    for ins in insertions {
        let end = ins.start + ins.duration;
        if ins.start > cursor {
            emit_primary(recordings, source_duration, cursor, ins.start, &mut out);
        }
        out.push(Segment {
            id: String::new(),
            content: ins.content.clone(),
            url: ins.url.clone(),
            trim: TimeSpan::at(0.0, ins.duration),
            transition_out: None,
            role: SegmentRole::Cutaway {
                source_audio: TimeSpan {
                    start: ins.start,
                    end,
                },
            },
        });
        cursor = end;
    }

    if cursor < source_duration {
        emit_primary(recordings, source_duration, cursor, source_duration, &mut out);
    }
    out
}

/// Emit primary footage for `[from, to)`, split at recording boundaries so each segment
/// trims exactly one recording.
fn emit_primary(
    recordings: &[Recording],
    source_duration: f64,
    from: f64,
    to: f64,
    out: &mut Vec<Segment>,
) {
    let mut rec_start = 0.0;
    for (i, rec) in recordings.iter().enumerate() {
        // The last recording absorbs any float drift up to the end of the audio.
        let rec_end = if i + 1 == recordings.len() {
            source_duration
        } else {
            rec_start + rec.duration
        };

        let start = from.max(rec_start);
        let end = to.min(rec_end);
        if end > start {
            out.push(Segment {
                id: String::new(),
                content: rec.content.clone(),
                url: rec.url.clone(),
                trim: TimeSpan {
                    start: start - rec_start,
                    end: end - rec_start,
                },
                transition_out: None,
                role: SegmentRole::Primary {
                    source_audio: TimeSpan { start, end },
                },
            });
        }

        if rec_end >= to {
            break;
        }
        rec_start = rec_end;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/interleave.rs"]
mod tests;
