//! The coordinating context: owns the current snapshot and everything derived
//! from it, and replaces all of it at once on refresh.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::layout::{LayoutPoint, compute_layout};
use crate::network::{GraphSnapshot, GraphSource, NetworkStatistics, NodeIndex, SnapshotRequest};
use crate::util::color_hex;

mod highlight;
mod search;
mod style;

pub use highlight::{Selection, SelectionEvent, highlight_edges};
pub use search::{SearchHit, search_nodes};
pub use style::{
    COMMUNITY_PALETTE, EdgeStyle, EdgeStylePolicy, NodeStyle, community_color, node_style,
};

/// Outcome of a successful refresh. An empty graph is a valid state, not an
/// error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refresh {
    Loaded { nodes: usize, edges: usize },
    Empty,
}

pub struct NetworkView {
    config: Config,
    snapshot: GraphSnapshot,
    index: NodeIndex,
    layout: Vec<LayoutPoint>,
    baseline: Vec<EdgeStyle>,
    edge_styles: Vec<EdgeStyle>,
    selection: Selection,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConnectedNode {
    pub id: String,
    pub label: String,
}

/// Everything shown for the focused node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeDetails {
    pub id: String,
    pub label: String,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub expertise: Vec<String>,
    pub degree: u32,
    pub total_projects: u32,
    pub connected: Vec<ConnectedNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub institution: Option<String>,
    pub community: u32,
    pub x: f32,
    pub y: f32,
    pub fill: String,
    pub border_color: String,
    pub border_width: f32,
    pub width: f32,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: f32,
    pub stroke: String,
    pub stroke_width: f32,
    pub opacity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    pub statistics: NetworkStatistics,
    pub selected: Option<String>,
}

impl NetworkView {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            snapshot: GraphSnapshot::empty(),
            index: NodeIndex::default(),
            layout: Vec::new(),
            baseline: Vec::new(),
            edge_styles: Vec::new(),
            selection: Selection::Idle,
        }
    }

    /// Fetches a new snapshot. On failure the current state is left exactly
    /// as it was.
    pub fn refresh<S: GraphSource>(
        &mut self,
        source: &mut S,
        request: &SnapshotRequest,
    ) -> Result<Refresh> {
        match source.fetch(request) {
            Ok(snapshot) => Ok(self.load(snapshot)),
            Err(error) => {
                warn!(%error, "network refresh failed; keeping previous graph");
                Err(error)
            }
        }
    }

    pub fn load(&mut self, snapshot: GraphSnapshot) -> Refresh {
        let index = NodeIndex::build(&snapshot);
        let layout = compute_layout(&snapshot.nodes, |node| node.community, &self.config.layout);
        let communities = snapshot
            .nodes
            .iter()
            .map(|node| node.community)
            .collect::<BTreeSet<_>>()
            .len();
        let policy = self.config.edges;
        let baseline = snapshot
            .edges
            .iter()
            .map(|edge| policy.baseline(edge.weight))
            .collect::<Vec<_>>();

        let selection = self.selection.apply(SelectionEvent::SnapshotReplaced, &index);
        let edge_styles = highlight_edges(&snapshot.edges, &baseline, &selection, &policy);

        let outcome = if snapshot.is_empty() {
            Refresh::Empty
        } else {
            Refresh::Loaded {
                nodes: snapshot.node_count(),
                edges: snapshot.edge_count(),
            }
        };
        info!(
            nodes = snapshot.node_count(),
            edges = snapshot.edge_count(),
            communities,
            "collaboration network loaded"
        );

        *self = Self {
            config: self.config.clone(),
            snapshot,
            index,
            layout,
            baseline,
            edge_styles,
            selection,
        };
        outcome
    }

    fn transition(&mut self, event: SelectionEvent) {
        let selection = self.selection.apply(event, &self.index);
        self.edge_styles = highlight_edges(
            &self.snapshot.edges,
            &self.baseline,
            &selection,
            &self.config.edges,
        );
        self.selection = selection;
    }

    /// Focuses `id`; returns false when the id is not in the snapshot.
    pub fn activate_node(&mut self, id: &str) -> bool {
        if !self.index.contains(id) {
            return false;
        }
        self.transition(SelectionEvent::ActivateNode(id.to_owned()));
        true
    }

    pub fn activate_background(&mut self) {
        self.transition(SelectionEvent::ActivateBackground);
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn layout(&self) -> &[LayoutPoint] {
        &self.layout
    }

    pub fn baseline_styles(&self) -> &[EdgeStyle] {
        &self.baseline
    }

    pub fn edge_styles(&self) -> &[EdgeStyle] {
        &self.edge_styles
    }

    pub fn details(&self) -> Option<NodeDetails> {
        let id = self.selection.focused()?;
        let node = self.index.node(&self.snapshot, id)?;

        let connected = self
            .index
            .neighbors(&self.snapshot, id)
            .into_iter()
            .filter_map(|neighbor| self.index.node(&self.snapshot, neighbor))
            .map(|neighbor| ConnectedNode {
                id: neighbor.id.clone(),
                label: neighbor.label.clone(),
            })
            .collect();

        Some(NodeDetails {
            id: node.id.clone(),
            label: node.label.clone(),
            institution: node.institution.clone(),
            department: node.department.clone(),
            expertise: node.expertise.clone(),
            degree: node.degree,
            total_projects: node.total_projects,
            connected,
        })
    }

    pub fn render(&self) -> RenderGraph {
        let nodes = self
            .layout
            .iter()
            .filter_map(|point| {
                let node = self.index.node(&self.snapshot, &point.node_id)?;
                let selected = self.selection.is_focused_on(&node.id);
                let style = node_style(node, selected);
                Some(RenderNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    institution: node.institution.clone(),
                    community: node.community,
                    x: point.position.x,
                    y: point.position.y,
                    fill: color_hex(style.fill),
                    border_color: color_hex(style.border.color),
                    border_width: style.border.width,
                    width: style.width,
                    selected,
                })
            })
            .collect();

        let edges = self
            .snapshot
            .edges
            .iter()
            .zip(&self.edge_styles)
            .map(|(edge, style)| RenderEdge {
                id: edge.id(),
                source: edge.source.clone(),
                target: edge.target.clone(),
                weight: edge.weight,
                stroke: color_hex(style.stroke.color),
                stroke_width: style.stroke.width,
                opacity: style.opacity,
            })
            .collect();

        RenderGraph {
            nodes,
            edges,
            statistics: self.snapshot.statistics.clone(),
            selected: self.selection.focused().map(str::to_owned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::network::{edge, node};

    struct ScriptedSource {
        next: Option<Result<GraphSnapshot>>,
    }

    impl GraphSource for ScriptedSource {
        fn fetch(&mut self, _request: &SnapshotRequest) -> Result<GraphSnapshot> {
            self.next
                .take()
                .unwrap_or_else(|| Err(Error::DataUnavailable("exhausted".into())))
        }
    }

    fn snapshot() -> GraphSnapshot {
        let mut a = node("a", 1, 2);
        a.institution = Some("USM".into());
        a.expertise = vec!["Graphs".into()];
        GraphSnapshot::new(
            vec![a, node("b", 1, 1), node("c", 2, 1)],
            vec![edge("a", "b", 2.0), edge("c", "a", 1.0)],
        )
    }

    fn loaded_view() -> NetworkView {
        let mut view = NetworkView::new(Config::default());
        assert_eq!(
            view.load(snapshot()),
            Refresh::Loaded { nodes: 3, edges: 2 }
        );
        view
    }

    #[test]
    fn test_load_builds_everything() {
        let view = loaded_view();
        assert_eq!(view.layout().len(), 3);
        assert_eq!(view.index().len(), 3);
        assert_eq!(view.edge_styles(), view.baseline_styles());
        assert_eq!(view.selection(), &Selection::Idle);
    }

    #[test]
    fn test_activate_and_revert() {
        let mut view = loaded_view();
        let baseline = view.baseline_styles().to_vec();

        assert!(view.activate_node("b"));
        assert_eq!(view.selection(), &Selection::Focused("b".into()));
        assert_ne!(view.edge_styles(), baseline.as_slice());

        assert!(!view.activate_node("ghost"));
        assert_eq!(view.selection(), &Selection::Focused("b".into()));

        view.activate_background();
        assert_eq!(view.selection(), &Selection::Idle);
        assert_eq!(view.edge_styles(), baseline.as_slice());
    }

    #[test]
    fn test_details_lists_neighbors() {
        let mut view = loaded_view();
        assert!(view.details().is_none());

        view.activate_node("a");
        let details = view.details().unwrap();
        assert_eq!(details.institution.as_deref(), Some("USM"));
        assert_eq!(details.expertise, vec!["Graphs"]);
        let connected = details
            .connected
            .iter()
            .map(|c| c.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(connected, vec!["b", "c"]);
    }

    #[test]
    fn test_render_marks_selection() {
        let mut view = loaded_view();
        view.activate_node("c");
        let rendered = view.render();

        assert_eq!(rendered.selected.as_deref(), Some("c"));
        let c = rendered.nodes.iter().find(|n| n.id == "c").unwrap();
        assert!(c.selected);
        assert_eq!(c.border_width, 3.0);
        assert_eq!(c.fill, color_hex(community_color(2)));

        let ab = rendered.edges.iter().find(|e| e.id == "a-b").unwrap();
        assert_eq!(ab.opacity, 0.15);
        let ca = rendered.edges.iter().find(|e| e.id == "c-a").unwrap();
        assert_eq!(ca.opacity, 1.0);
        assert_eq!(ca.stroke, "#FFD700");
    }

    #[test]
    fn test_refresh_resets_selection() {
        let mut view = loaded_view();
        view.activate_node("a");

        let mut source = ScriptedSource {
            next: Some(Ok(snapshot())),
        };
        let outcome = view.refresh(&mut source, &SnapshotRequest::default()).unwrap();
        assert_eq!(outcome, Refresh::Loaded { nodes: 3, edges: 2 });
        assert_eq!(view.selection(), &Selection::Idle);
        assert_eq!(view.edge_styles(), view.baseline_styles());
    }

    #[test]
    fn test_failed_refresh_preserves_state() {
        let mut view = loaded_view();
        view.activate_node("a");
        let before = view.render();

        let mut source = ScriptedSource {
            next: Some(Err(Error::DataUnavailable("offline".into()))),
        };
        let result = view.refresh(&mut source, &SnapshotRequest::default());
        assert!(matches!(result, Err(Error::DataUnavailable(_))));
        assert_eq!(view.render(), before);
        assert_eq!(view.selection(), &Selection::Focused("a".into()));
    }

    #[test]
    fn test_empty_snapshot_is_not_an_error() {
        let mut view = loaded_view();
        let mut source = ScriptedSource {
            next: Some(Ok(GraphSnapshot::empty())),
        };
        let outcome = view.refresh(&mut source, &SnapshotRequest::default()).unwrap();
        assert_eq!(outcome, Refresh::Empty);
        assert!(view.render().nodes.is_empty());
        assert!(view.layout().is_empty());
    }
}
