use super::*;
use crate::foundation::error::FailureCategory;

fn clip(id: &str) -> ProposedSegment {
    ProposedSegment::new(ContentRef::library(id), 5.0)
}

#[test]
fn builder_produces_sequence_request() {
    let req = RequestBuilder::new(10.0)
        .aspect(Aspect::Portrait)
        .library_item(candidate("a", 8.0, "https://cdn.example/a.mp4"))
        .unwrap()
        .library_item(candidate("b", 8.0, "https://cdn.example/b.mp4"))
        .unwrap()
        .segment(clip("a"))
        .segment(clip("b"))
        .music(audio_bed(ContentRef::library("a")))
        .build()
        .unwrap();

    assert_eq!(req.target().unwrap(), 10.0);
    assert_eq!(req.resolved_canvas(), Aspect::Portrait.canvas());
    let CompositionPlan::Sequence { segments } = &req.plan else {
        panic!("expected a sequence plan");
    };
    assert_eq!(segments.len(), 2);
    assert_eq!(req.tracks.music.as_ref().unwrap().volume, 1.0);
}

#[test]
fn speakers_select_cutaway_mode() {
    let req = RequestBuilder::new(30.0)
        .owned_item(candidate("talk", 30.0, "https://cdn.example/talk.mp4"))
        .unwrap()
        .library_item(candidate("b-roll", 10.0, "https://cdn.example/b.mp4"))
        .unwrap()
        .speaker(ContentRef::owned("talk"))
        .cutaway(5.0, 4.0, ContentRef::library("b-roll"))
        .build()
        .unwrap();

    let CompositionPlan::Cutaway(plan) = &req.plan else {
        panic!("expected a cutaway plan");
    };
    assert_eq!(plan.speakers, [ContentRef::owned("talk")]);
    assert_eq!(plan.insertions.len(), 1);
    assert_eq!(plan.source_duration, None);
}

#[test]
fn duplicate_pool_ids_are_rejected_per_side() {
    let builder = RequestBuilder::new(10.0)
        .library_item(candidate("x", 5.0, "u"))
        .unwrap()
        .owned_item(candidate("x", 5.0, "u"))
        .unwrap();
    assert!(builder.library_item(candidate("x", 5.0, "u")).is_err());
}

#[test]
fn mixing_modes_is_rejected() {
    let err = RequestBuilder::new(10.0)
        .library_item(candidate("a", 8.0, "u"))
        .unwrap()
        .segment(clip("a"))
        .speaker(ContentRef::library("a"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("mixes"));
}

#[test]
fn cutaways_without_speaker_are_rejected() {
    let err = RequestBuilder::new(10.0)
        .library_item(candidate("a", 8.0, "u"))
        .unwrap()
        .cutaway(1.0, 4.0, ContentRef::library("a"))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("speaker"));
}

#[test]
fn build_runs_request_validation() {
    let err = RequestBuilder::new(0.0)
        .library_item(candidate("a", 8.0, "u"))
        .unwrap()
        .segment(clip("a"))
        .build()
        .unwrap_err();
    assert_eq!(err.category(), FailureCategory::NoValidTarget);

    let err = RequestBuilder::new(10.0).segment(clip("a")).build().unwrap_err();
    assert!(matches!(err, SplicerError::EmptyPool));
}
