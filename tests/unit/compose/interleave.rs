use super::*;

fn speaker(id: &str, duration: f64) -> Recording {
    Recording {
        content: ContentRef::owned(id),
        url: format!("https://cdn.example/{id}.mp4"),
        duration,
    }
}

fn broll(start: f64, duration: f64, id: &str) -> Insertion {
    Insertion {
        start,
        duration,
        content: ContentRef::library(id),
        url: format!("https://cdn.example/{id}.mp4"),
        item_duration: 60.0,
    }
}

fn audio_sum(segs: &[Segment]) -> f64 {
    segs.iter()
        .map(|s| s.role.source_audio().unwrap().len())
        .sum()
}

fn filtered(ins: Vec<Insertion>, total: f64) -> (Vec<Insertion>, Vec<Diagnostic>) {
    let mut diags = Vec::new();
    let kept = filter_insertions(ins, total, &ComposeOpts::default(), &mut diags);
    (kept, diags)
}

#[test]
fn overlapping_insertion_is_dropped_and_five_segments_cover_thirty_seconds() {
    let (kept, diags) = filtered(
        vec![broll(5.0, 4.0, "a"), broll(6.0, 3.0, "b"), broll(20.0, 5.0, "c")],
        30.0,
    );
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].content.id(), "a");
    assert_eq!(kept[1].content.id(), "c");
    assert!(matches!(
        diags[0],
        Diagnostic::CutawayDropped {
            reason: CutawayDropReason::TooClose,
            ..
        }
    ));

    let segs = interleave(&[speaker("talk", 30.0)], 30.0, &kept);
    let roles: Vec<_> = segs.iter().map(|s| s.role.name()).collect();
    assert_eq!(
        roles,
        ["primary", "cutaway", "primary", "cutaway", "primary"]
    );
    assert_eq!(audio_sum(&segs), 30.0);

    let cut = &segs[1];
    assert_eq!(cut.trim, TimeSpan { start: 0.0, end: 4.0 });
    assert_eq!(cut.role.source_audio().unwrap(), TimeSpan { start: 5.0, end: 9.0 });
    let mid = &segs[2];
    assert_eq!(mid.trim, TimeSpan { start: 9.0, end: 20.0 });
    assert!(segs.iter().all(|s| s.transition_out.is_none()));
}

#[test]
fn no_insertions_yields_single_full_length_primary() {
    let segs = interleave(&[speaker("talk", 42.5)], 42.5, &[]);
    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].trim, TimeSpan { start: 0.0, end: 42.5 });
    assert_eq!(audio_sum(&segs), 42.5);
}

#[test]
fn short_insertions_are_dropped_before_gap_check() {
    let (kept, diags) = filtered(vec![broll(4.0, 2.0, "a"), broll(7.0, 3.0, "b")], 30.0);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].content.id(), "b");
    assert!(matches!(
        diags[0],
        Diagnostic::CutawayDropped {
            reason: CutawayDropReason::TooShort,
            ..
        }
    ));
}

#[test]
fn insertions_are_sorted_by_start() {
    let (kept, _) = filtered(vec![broll(20.0, 4.0, "late"), broll(2.0, 4.0, "early")], 30.0);
    assert_eq!(kept[0].content.id(), "early");
    assert_eq!(kept[1].content.id(), "late");
}

#[test]
fn insertion_at_zero_starts_with_cutaway() {
    let (kept, _) = filtered(vec![broll(0.0, 5.0, "a")], 12.0);
    let segs = interleave(&[speaker("talk", 12.0)], 12.0, &kept);
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].role.name(), "cutaway");
    assert_eq!(segs[1].trim, TimeSpan { start: 5.0, end: 12.0 });
}

#[test]
fn insertion_past_the_end_is_truncated_or_dropped() {
    let (kept, diags) = filtered(
        vec![broll(24.0, 10.0, "tail"), broll(31.0, 4.0, "after")],
        30.0,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].duration, 6.0);
    assert!(diags.iter().any(|d| matches!(
        d,
        Diagnostic::CutawayDropped {
            reason: CutawayDropReason::OutOfRange,
            ..
        }
    )));

    let segs = interleave(&[speaker("talk", 30.0)], 30.0, &kept);
    assert_eq!(segs.len(), 2);
    assert_eq!(segs.last().unwrap().role.name(), "cutaway");
    assert_eq!(audio_sum(&segs), 30.0);
}

#[test]
fn insertion_longer_than_its_item_is_shortened() {
    let mut ins = broll(5.0, 8.0, "short-clip");
    ins.item_duration = 4.0;
    let (kept, diags) = filtered(vec![ins], 30.0);
    assert_eq!(kept[0].duration, 4.0);
    assert!(
        diags
            .iter()
            .any(|d| matches!(d, Diagnostic::CutawayShortened { to, .. } if *to == 4.0))
    );
}

#[test]
fn primary_spans_split_at_recording_boundaries() {
    let recs = [speaker("part1", 10.0), speaker("part2", 20.0)];
    let (kept, _) = filtered(vec![broll(15.0, 4.0, "a")], 30.0);
    let segs = interleave(&recs, 30.0, &kept);

    let summary: Vec<_> = segs
        .iter()
        .map(|s| (s.content.id().to_owned(), s.trim.start, s.trim.end))
        .collect();
    assert_eq!(
        summary,
        [
            ("part1".to_owned(), 0.0, 10.0),
            ("part2".to_owned(), 0.0, 5.0),
            ("a".to_owned(), 0.0, 4.0),
            ("part2".to_owned(), 9.0, 20.0),
        ]
    );
    assert_eq!(
        segs[3].role.source_audio().unwrap(),
        TimeSpan {
            start: 19.0,
            end: 30.0
        }
    );
    assert_eq!(audio_sum(&segs), 30.0);
}

#[test]
fn property_audio_windows_tile_the_source_exactly() {
    let cases: &[(f64, &[(f64, f64)])] = &[
        (30.0, &[]),
        (30.0, &[(5.0, 4.0), (6.0, 3.0), (20.0, 5.0)]),
        (60.0, &[(0.0, 3.0), (6.0, 3.0), (12.0, 10.0), (40.0, 30.0)]),
        (17.0, &[(14.0, 3.0)]),
        (9.0, &[(1.0, 1.0), (2.0, 7.0)]),
    ];
    for &(total, proposals) in cases {
        let ins = proposals
            .iter()
            .enumerate()
            .map(|(i, &(s, d))| broll(s, d, &format!("b{i}")))
            .collect();
        let (kept, _) = filtered(ins, total);
        let segs = interleave(&[speaker("talk", total)], total, &kept);

        assert_eq!(audio_sum(&segs), total, "total {total}");
        let mut cursor = 0.0;
        for s in &segs {
            let w = s.role.source_audio().unwrap();
            assert_eq!(w.start, cursor);
            assert!(s.visible_duration() > 0.0);
            assert!((s.visible_duration() - w.len()).abs() < 1e-12);
            cursor = w.end;
        }
        assert_eq!(cursor, total);
    }
}
