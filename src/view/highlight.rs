use tracing::debug;

use super::style::{EdgeStyle, EdgeStylePolicy};
use crate::network::{Edge, NodeIndex};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Focused(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    ActivateNode(String),
    ActivateBackground,
    SnapshotReplaced,
}

impl Selection {
    pub fn focused(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Focused(id) => Some(id.as_str()),
        }
    }

    pub fn is_focused_on(&self, id: &str) -> bool {
        self.focused() == Some(id)
    }

    /// Next state for `event`. Activating a node that is not part of the
    /// current snapshot leaves the selection as it was.
    pub fn apply(&self, event: SelectionEvent, index: &NodeIndex) -> Selection {
        match event {
            SelectionEvent::ActivateNode(id) if index.contains(&id) => Self::Focused(id),
            SelectionEvent::ActivateNode(id) => {
                debug!(%id, "ignoring activation of unknown node");
                self.clone()
            }
            SelectionEvent::ActivateBackground | SelectionEvent::SnapshotReplaced => Self::Idle,
        }
    }
}

/// Edge styles for `selection`. `baseline` must be parallel to `edges`; an
/// idle selection returns it unchanged.
pub fn highlight_edges(
    edges: &[Edge],
    baseline: &[EdgeStyle],
    selection: &Selection,
    policy: &EdgeStylePolicy,
) -> Vec<EdgeStyle> {
    let Some(selected) = selection.focused() else {
        return baseline.to_vec();
    };

    edges
        .iter()
        .map(|edge| {
            if edge.touches(selected) {
                policy.connected(edge.weight)
            } else {
                policy.dimmed()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{GraphSnapshot, edge, node};

    fn fixture() -> (GraphSnapshot, NodeIndex, Vec<EdgeStyle>, EdgeStylePolicy) {
        let snapshot = GraphSnapshot::new(
            vec![node("a", 0, 2), node("b", 0, 1), node("c", 0, 1)],
            vec![edge("a", "b", 1.0), edge("c", "a", 3.0), edge("b", "c", 2.0)],
        );
        let index = NodeIndex::build(&snapshot);
        let policy = EdgeStylePolicy::default();
        let baseline = snapshot
            .edges
            .iter()
            .map(|e| policy.baseline(e.weight))
            .collect();
        (snapshot, index, baseline, policy)
    }

    #[test]
    fn test_transitions() {
        let (_, index, _, _) = fixture();
        let idle = Selection::default();

        let focused = idle.apply(SelectionEvent::ActivateNode("a".into()), &index);
        assert_eq!(focused, Selection::Focused("a".into()));

        let moved = focused.apply(SelectionEvent::ActivateNode("b".into()), &index);
        assert_eq!(moved, Selection::Focused("b".into()));

        assert_eq!(
            moved.apply(SelectionEvent::ActivateBackground, &index),
            Selection::Idle
        );
        assert_eq!(
            moved.apply(SelectionEvent::SnapshotReplaced, &index),
            Selection::Idle
        );
    }

    #[test]
    fn test_unknown_node_keeps_state() {
        let (_, index, _, _) = fixture();
        let focused = Selection::Focused("a".into());
        assert_eq!(
            focused.apply(SelectionEvent::ActivateNode("zzz".into()), &index),
            focused
        );
        assert_eq!(
            Selection::Idle.apply(SelectionEvent::ActivateNode("zzz".into()), &index),
            Selection::Idle
        );
    }

    #[test]
    fn test_connected_edges_emphasized() {
        let (snapshot, _, baseline, policy) = fixture();
        let styles = highlight_edges(
            &snapshot.edges,
            &baseline,
            &Selection::Focused("a".into()),
            &policy,
        );

        assert_eq!(styles[0], policy.connected(1.0));
        assert_eq!(styles[1], policy.connected(3.0));
        assert_eq!(styles[2], policy.dimmed());
        assert_eq!(styles[2].opacity, 0.15);
    }

    #[test]
    fn test_reselect_is_idempotent() {
        let (snapshot, index, baseline, policy) = fixture();
        let first = Selection::Idle.apply(SelectionEvent::ActivateNode("b".into()), &index);
        let first_styles = highlight_edges(&snapshot.edges, &baseline, &first, &policy);

        let again = first.apply(SelectionEvent::ActivateNode("b".into()), &index);
        let again_styles = highlight_edges(&snapshot.edges, &baseline, &again, &policy);

        assert_eq!(first, again);
        assert_eq!(first_styles, again_styles);
    }

    #[test]
    fn test_idle_restores_baseline_exactly() {
        let (snapshot, index, baseline, policy) = fixture();
        let focused = Selection::Idle.apply(SelectionEvent::ActivateNode("c".into()), &index);
        let highlighted = highlight_edges(&snapshot.edges, &baseline, &focused, &policy);
        assert_ne!(highlighted, baseline);

        let idle = focused.apply(SelectionEvent::ActivateBackground, &index);
        let restored = highlight_edges(&snapshot.edges, &baseline, &idle, &policy);
        for (restored, original) in restored.iter().zip(&baseline) {
            assert_eq!(restored.stroke.width.to_bits(), original.stroke.width.to_bits());
            assert_eq!(restored.opacity.to_bits(), original.opacity.to_bits());
            assert_eq!(restored.stroke.color, original.stroke.color);
        }
    }
}
