use crate::{
    compose::diagnostics::Diagnostic,
    compose::overlap::transition_overlap,
    foundation::core::round_to,
    request::model::ProposedSegment,
    request::opts::ComposeOpts,
};

/// Below this, floats are considered equal (pure representation noise).
const NOISE: f64 = 1e-9;

/// Rescale proposed durations so the effective duration (visible sum minus interior
/// transition overlap) lands on `target`.
///
/// Segments never drop below `opts.min_segment_duration`. When the minimum makes the target
/// unreachable the result is longer than requested and a
/// [`Diagnostic::TargetUnreachable`] is recorded. Rounding residue goes onto the tail of the
/// sequence: growth onto the last segment, shrinkage onto the latest segments still above the
/// minimum.
pub fn normalize_durations(
    mut segments: Vec<ProposedSegment>,
    target: f64,
    opts: &ComposeOpts,
    diags: &mut Vec<Diagnostic>,
) -> Vec<ProposedSegment> {
    if segments.is_empty() {
        return segments;
    }

    let eps = opts.epsilon;
    let min = opts.min_segment_duration;
    let overlap = transition_overlap(&segments);
    let adjusted = target + overlap;
    let current: f64 = segments.iter().map(|s| s.duration).sum();

    let all_above_min = segments.iter().all(|s| s.duration >= min);
    if (current - adjusted).abs() < eps && all_above_min {
        return segments;
    }
    diags.push(Diagnostic::DurationsScaled {
        from: current,
        to: adjusted,
    });

    // All-zero proposals share the budget evenly.
    let weights: Vec<f64> = if current > 0.0 {
        segments.iter().map(|s| s.duration).collect()
    } else {
        vec![1.0; segments.len()]
    };
    let pinned = pin_below_minimum(&weights, adjusted, min);
    let pinned_count = pinned.iter().filter(|&&p| p).count();
    let free_weight: f64 = weights
        .iter()
        .zip(&pinned)
        .filter(|(_, p)| !**p)
        .map(|(w, _)| w)
        .sum();
    let budget = adjusted - min * pinned_count as f64;
    let factor = if free_weight > 0.0 {
        budget / free_weight
    } else {
        0.0
    };

    for (i, (seg, (&w, &p))) in segments
        .iter_mut()
        .zip(weights.iter().zip(&pinned))
        .enumerate()
    {
        if p {
            diags.push(Diagnostic::SegmentClamped {
                index: i,
                proposed: seg.duration,
                clamped: min,
            });
            seg.duration = min;
        } else {
            seg.duration = round_to(w * factor, opts.round_decimals).max(min);
        }
    }

    let sum: f64 = segments.iter().map(|s| s.duration).sum();
    let residual = adjusted - sum;
    if residual.abs() > NOISE {
        absorb_from_tail(&mut segments, residual, min);
        diags.push(Diagnostic::ResidualApplied { amount: residual });
    }

    let effective = segments.iter().map(|s| s.duration).sum::<f64>() - overlap;
    let deviation = target - effective;
    if deviation.abs() > eps {
        let unabsorbed = absorb_from_tail(&mut segments, deviation, min);
        diags.push(Diagnostic::ForcedResidual { amount: deviation });

        let effective = segments.iter().map(|s| s.duration).sum::<f64>() - overlap;
        if unabsorbed.abs() > NOISE || (target - effective).abs() > eps {
            diags.push(Diagnostic::TargetUnreachable { effective, target });
        }
    }

    segments
}

/// Mark every weight that would scale below `min` once the budget is shared among the rest.
///
/// Pinning a segment shrinks the budget left for the others, so this repeats until stable.
fn pin_below_minimum(weights: &[f64], budget_total: f64, min: f64) -> Vec<bool> {
    let mut pinned = vec![false; weights.len()];
    loop {
        let pinned_count = pinned.iter().filter(|&&p| p).count();
        let budget = budget_total - min * pinned_count as f64;
        let free: f64 = weights
            .iter()
            .zip(&pinned)
            .filter(|(_, p)| !**p)
            .map(|(w, _)| w)
            .sum();
        if free <= 0.0 || budget <= 0.0 {
            pinned.iter_mut().for_each(|p| *p = true);
            return pinned;
        }

        let factor = budget / free;
        let mut changed = false;
        for (w, p) in weights.iter().zip(pinned.iter_mut()) {
            if !*p && w * factor < min {
                *p = true;
                changed = true;
            }
        }
        if !changed {
            return pinned;
        }
    }
}

/// Add `amount` seconds without taking any segment below `min`.
///
/// Growth lands on the last segment. Shrinkage walks backwards from the last segment, taking
/// what each can give above the minimum. Returns the part nothing could absorb.
fn absorb_from_tail(segments: &mut [ProposedSegment], amount: f64, min: f64) -> f64 {
    if amount >= 0.0 {
        if let Some(last) = segments.last_mut() {
            last.duration += amount;
        }
        return 0.0;
    }

    let mut left = -amount;
    for seg in segments.iter_mut().rev() {
        let take = (seg.duration - min).max(0.0).min(left);
        seg.duration -= take;
        left -= take;
        if left <= NOISE {
            return 0.0;
        }
    }
    -left
}

#[cfg(test)]
#[path = "../../tests/unit/compose/normalize.rs"]
mod tests;
