use super::*;
use crate::timeline::model::TransitionKind;

struct Item(Option<Transition>);

impl HasTransition for Item {
    fn transition_out(&self) -> Option<&Transition> {
        self.0.as_ref()
    }
}

fn fade(d: f64) -> Option<Transition> {
    Some(Transition {
        kind: TransitionKind::Crossfade,
        duration: d,
    })
}

#[test]
fn empty_and_single_item_lists_have_no_overlap() {
    assert_eq!(transition_overlap::<Item>(&[]), 0.0);
    assert_eq!(transition_overlap(&[Item(fade(1.0))]), 0.0);
}

#[test]
fn sums_interior_transitions_only() {
    let items = [
        Item(fade(0.5)),
        Item(fade(0.5)),
        Item(None),
        Item(fade(2.0)),
    ];
    assert_eq!(transition_overlap(&items), 1.0);
}

#[test]
fn hard_cuts_do_not_shorten_playback() {
    let items = [
        Item(Some(Transition {
            kind: TransitionKind::None,
            duration: 1.0,
        })),
        Item(Some(Transition {
            kind: TransitionKind::WipeLeft,
            duration: 0.25,
        })),
        Item(None),
    ];
    assert_eq!(transition_overlap(&items), 0.25);
}

#[test]
fn negative_durations_are_treated_as_zero() {
    let items = [Item(fade(-1.0)), Item(None)];
    assert_eq!(transition_overlap(&items), 0.0);
}
