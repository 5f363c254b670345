use super::*;
use crate::timeline::model::{ContentRef, Transition, TransitionKind};

fn seg(id: &str, d: f64) -> ProposedSegment {
    ProposedSegment::new(ContentRef::library(id), d)
}

fn crossfade(d: f64) -> Transition {
    Transition {
        kind: TransitionKind::Crossfade,
        duration: d,
    }
}

fn effective(segs: &[ProposedSegment]) -> f64 {
    segs.iter().map(|s| s.duration).sum::<f64>() - transition_overlap(segs)
}

fn run(segs: Vec<ProposedSegment>, target: f64, opts: &ComposeOpts) -> (Vec<ProposedSegment>, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let out = normalize_durations(segs, target, opts, &mut diags);
    (out, diags)
}

#[test]
fn four_six_second_clips_with_two_transitions_fit_twenty_seconds() {
    let segs = vec![
        seg("a", 6.0).with_transition(crossfade(0.5)),
        seg("b", 6.0).with_transition(crossfade(0.5)),
        seg("c", 6.0),
        seg("d", 6.0),
    ];
    let (out, diags) = run(segs, 20.0, &ComposeOpts::default());

    assert_eq!(out.len(), 4);
    for s in &out[..3] {
        assert!((s.duration - 5.25).abs() <= 0.05 + 1e-9, "{}", s.duration);
    }
    let visible: f64 = out.iter().map(|s| s.duration).sum();
    assert!((visible - 21.0).abs() < 1e-9);
    assert!((effective(&out) - 20.0).abs() <= 0.05);
    assert!(matches!(diags[0], Diagnostic::DurationsScaled { .. }));
}

#[test]
fn two_decimal_rounding_keeps_exact_quarter_seconds() {
    let segs = vec![
        seg("a", 6.0).with_transition(crossfade(0.5)),
        seg("b", 6.0).with_transition(crossfade(0.5)),
        seg("c", 6.0),
        seg("d", 6.0),
    ];
    let opts = ComposeOpts {
        round_decimals: 2,
        ..ComposeOpts::default()
    };
    let (out, diags) = run(segs, 20.0, &opts);
    for s in &out {
        assert_eq!(s.duration, 5.25);
    }
    assert!(
        !diags
            .iter()
            .any(|d| matches!(d, Diagnostic::ResidualApplied { .. }))
    );
}

#[test]
fn matching_durations_are_returned_unchanged() {
    let segs = vec![seg("a", 10.0), seg("b", 10.02)];
    let (out, diags) = run(segs.clone(), 20.0, &ComposeOpts::default());
    assert_eq!(out, segs);
    assert!(diags.is_empty());
}

#[test]
fn lengthening_scales_up_and_hits_target() {
    let segs = vec![seg("a", 3.0), seg("b", 4.0), seg("c", 3.0)];
    let (out, _) = run(segs, 30.0, &ComposeOpts::default());
    assert!((effective(&out) - 30.0).abs() <= 0.05);
    assert!((out[1].duration - 12.0).abs() < 1e-9);
}

#[test]
fn shortening_pins_small_segments_at_minimum() {
    // Uniform scaling would give 1.0 / 9.0; the short clip is pinned instead.
    let segs = vec![seg("a", 2.0), seg("b", 18.0)];
    let (out, diags) = run(segs, 10.0, &ComposeOpts::default());
    assert_eq!(out[0].duration, 2.0);
    assert!((out[1].duration - 8.0).abs() < 1e-9);
    assert!(
        diags
            .iter()
            .any(|d| matches!(d, Diagnostic::SegmentClamped { index: 0, .. }))
    );
}

#[test]
fn sub_minimum_proposals_are_lifted_even_when_sum_matches() {
    let segs = vec![seg("a", 1.0), seg("b", 19.0)];
    let (out, _) = run(segs, 20.0, &ComposeOpts::default());
    assert_eq!(out[0].duration, 2.0);
    assert!((effective(&out) - 20.0).abs() <= 0.05);
}

#[test]
fn too_short_target_exceeds_rather_than_going_below_minimum() {
    let segs: Vec<_> = (0..12).map(|i| seg(&format!("s{i}"), 6.0)).collect();
    let (out, diags) = run(segs, 20.0, &ComposeOpts::default());
    assert!(out.iter().all(|s| s.duration >= 2.0));
    assert!((effective(&out) - 24.0).abs() < 1e-9);
    assert!(diags.iter().any(|d| matches!(
        d,
        Diagnostic::TargetUnreachable { target, .. } if *target == 20.0
    )));
}

#[test]
fn residue_lands_on_last_segment() {
    let segs = vec![seg("a", 1.0), seg("b", 1.0), seg("c", 1.0)];
    let opts = ComposeOpts {
        min_segment_duration: 0.5,
        ..ComposeOpts::default()
    };
    let (out, diags) = run(segs, 10.0, &opts);
    assert_eq!(out[0].duration, 3.3);
    assert_eq!(out[1].duration, 3.3);
    assert!((out[2].duration - 3.4).abs() < 1e-9);
    assert!(
        diags
            .iter()
            .any(|d| matches!(d, Diagnostic::ResidualApplied { .. }))
    );
}

#[test]
fn negative_residue_skips_a_pinned_last_segment() {
    let segs = vec![seg("a", 1.0), seg("b", 1.0), seg("c", 1.0), seg("d", 0.1)];
    let (out, diags) = run(segs, 20.18, &ComposeOpts::default());

    assert_eq!(out[3].duration, 2.0);
    assert_eq!(out[0].duration, 6.1);
    assert!((out[2].duration - 5.98).abs() < 1e-9, "{}", out[2].duration);
    assert!((effective(&out) - 20.18).abs() <= 0.05, "{}", effective(&out));
    assert!(out.iter().all(|s| s.duration >= 2.0));
    assert!(
        !diags
            .iter()
            .any(|d| matches!(d, Diagnostic::TargetUnreachable { .. }))
    );
}

#[test]
fn all_zero_proposals_share_the_target_evenly() {
    let segs = vec![seg("a", 0.0), seg("b", 0.0)];
    let (out, _) = run(segs, 12.0, &ComposeOpts::default());
    assert_eq!(out[0].duration, 6.0);
    assert_eq!(out[1].duration, 6.0);
}

#[test]
fn order_and_references_are_preserved() {
    let segs = vec![seg("x", 5.0), seg("y", 7.0), seg("z", 9.0)];
    let (out, _) = run(segs, 15.0, &ComposeOpts::default());
    let ids: Vec<_> = out.iter().map(|s| s.content.id().to_owned()).collect();
    assert_eq!(ids, ["x", "y", "z"]);
}

#[test]
fn property_effective_duration_within_epsilon_for_reachable_targets() {
    let shapes: &[&[f64]] = &[
        &[6.0, 6.0, 6.0, 6.0],
        &[2.5, 9.1, 4.4],
        &[12.0, 3.0, 7.7, 5.5, 8.0],
        &[30.0],
        &[1.0, 1.0, 1.0, 0.1],
        &[9.0, 0.2],
    ];
    for shape in shapes {
        for target in [15.0, 20.18, 23.3, 41.7, 60.0] {
            if target < 2.0 * shape.len() as f64 {
                continue;
            }
            let segs: Vec<_> = shape
                .iter()
                .enumerate()
                .map(|(i, &d)| {
                    let s = seg(&format!("s{i}"), d);
                    if i % 2 == 0 {
                        s.with_transition(crossfade(0.4))
                    } else {
                        s
                    }
                })
                .collect();
            let (out, _) = run(segs, target, &ComposeOpts::default());
            assert!(
                (effective(&out) - target).abs() <= 0.05,
                "shape {shape:?} target {target}: {}",
                effective(&out)
            );
            assert!(out.iter().all(|s| s.duration >= 2.0));
        }
    }
}
