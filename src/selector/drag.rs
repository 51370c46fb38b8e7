//! Drag-to-reorder state machine for features
//!
//! `Idle --start(src)--> Dragging(src) --drop(tgt)--> Dropped(src, tgt) --finish--> Idle`

use crate::model::{Feature, Id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: Id,
    },
    Dropped {
        source: Id,
        target: Id,
    },
}

impl DragState {
    /// Begin dragging `source`. Ignored unless idle.
    pub fn start(&mut self, source: Id) {
        if *self == DragState::Idle {
            *self = DragState::Dragging { source };
        }
    }

    /// Drop onto `target`. Dropping onto the source itself is ignored and
    /// keeps the drag alive.
    pub fn drop_on(&mut self, target: Id) {
        if let DragState::Dragging { source } = *self {
            if source != target {
                *self = DragState::Dropped { source, target };
            }
        }
    }

    /// Consume a completed drop, returning to idle
    pub fn finish(&mut self) -> Option<(Id, Id)> {
        match *self {
            DragState::Dropped { source, target } => {
                *self = DragState::Idle;
                Some((source, target))
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }

    /// Feature currently being dragged, if any
    pub fn source(&self) -> Option<Id> {
        match *self {
            DragState::Dragging { source } | DragState::Dropped { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }
}

/// Move `source` to the index `target` occupied before the move, then
/// renumber `order` to 1..n. `None` if either id is unknown or they match.
pub fn reorder(features: &[Feature], source: Id, target: Id) -> Option<Vec<Feature>> {
    if source == target {
        return None;
    }
    let from = features.iter().position(|f| f.id == source)?;
    let to = features.iter().position(|f| f.id == target)?;

    let mut reordered = features.to_vec();
    let moved = reordered.remove(from);
    reordered.insert(to.min(reordered.len()), moved);

    for (idx, feature) in reordered.iter_mut().enumerate() {
        feature.order = idx as i64 + 1;
    }
    Some(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::feature;

    fn abc() -> Vec<Feature> {
        vec![
            feature(1, "A", 1, &[]),
            feature(2, "B", 2, &[]),
            feature(3, "C", 3, &[]),
        ]
    }

    fn names(features: &[Feature]) -> Vec<(&str, i64)> {
        features.iter().map(|f| (f.name.as_str(), f.order)).collect()
    }

    #[test]
    fn dragging_first_onto_last() {
        let result = reorder(&abc(), 1, 3).unwrap();
        assert_eq!(names(&result), vec![("B", 1), ("C", 2), ("A", 3)]);
    }

    #[test]
    fn dragging_last_onto_first() {
        let result = reorder(&abc(), 3, 1).unwrap();
        assert_eq!(names(&result), vec![("C", 1), ("A", 2), ("B", 3)]);
    }

    #[test]
    fn dragging_onto_neighbour() {
        let result = reorder(&abc(), 2, 3).unwrap();
        assert_eq!(names(&result), vec![("A", 1), ("C", 2), ("B", 3)]);
    }

    #[test]
    fn unknown_or_same_ids_do_nothing() {
        assert!(reorder(&abc(), 1, 1).is_none());
        assert!(reorder(&abc(), 1, 42).is_none());
        assert!(reorder(&abc(), 42, 1).is_none());
    }

    #[test]
    fn machine_transitions() {
        let mut drag = DragState::default();
        assert_eq!(drag.finish(), None);

        drag.drop_on(2);
        assert_eq!(drag, DragState::Idle);

        drag.start(1);
        drag.drop_on(1);
        assert_eq!(drag, DragState::Dragging { source: 1 });

        drag.drop_on(3);
        assert_eq!(drag.source(), Some(1));
        assert_eq!(drag.finish(), Some((1, 3)));
        assert_eq!(drag, DragState::Idle);

        drag.start(2);
        drag.cancel();
        assert_eq!(drag, DragState::Idle);
    }
}
