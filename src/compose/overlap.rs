use crate::timeline::model::Transition;

/// Anything that may carry an outgoing transition into its successor.
pub trait HasTransition {
    /// Outgoing transition, if any.
    fn transition_out(&self) -> Option<&Transition>;
}

/// Total playback time consumed by transitions between consecutive items.
///
/// Only interior transitions count: the last item's outgoing transition has nothing to
/// overlap with. Hard cuts and absent transitions contribute nothing.
pub fn transition_overlap<T: HasTransition>(items: &[T]) -> f64 {
    let Some((_, interior)) = items.split_last() else {
        return 0.0;
    };
    interior
        .iter()
        .filter_map(|item| item.transition_out())
        .map(Transition::overlap)
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlap.rs"]
mod tests;
