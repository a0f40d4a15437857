use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::util::round_to;

/// Community assigned to nodes whose payload carries none.
pub const DEFAULT_COMMUNITY: u32 = 0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub community: u32,
    pub degree: u32,
    pub size: f32,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub expertise: Vec<String>,
    pub total_projects: u32,
}

impl Node {
    pub fn default_size(degree: u32) -> f32 {
        (50.0 + degree as f32 * 15.0).max(50.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f32,
}

impl Edge {
    pub fn id(&self) -> String {
        format!("{}-{}", self.source, self.target)
    }

    /// Edges are undirected for highlighting purposes.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub total_researchers: usize,
    pub total_collaborations: usize,
    pub avg_collaborators_per_person: f64,
    pub network_density: f64,
}

impl NetworkStatistics {
    pub fn compute(nodes: &[Node], edges: &[Edge]) -> Self {
        let total_researchers = nodes.len();
        let total_collaborations = edges.len();

        let avg_collaborators = if total_researchers == 0 {
            0.0
        } else {
            let degree_sum = nodes.iter().map(|node| node.degree as f64).sum::<f64>();
            degree_sum / total_researchers as f64
        };

        let n = total_researchers as f64;
        let max_edges = (n * (n - 1.0) / 2.0).max(1.0);
        let network_density = total_collaborations as f64 / max_edges;

        Self {
            total_researchers,
            total_collaborations,
            avg_collaborators_per_person: round_to(avg_collaborators, 2),
            network_density: round_to(network_density, 4),
        }
    }
}

/// One complete graph payload. Replaced wholesale, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub statistics: NetworkStatistics,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let statistics = NetworkStatistics::compute(&nodes, &edges);
        Self {
            nodes,
            edges,
            statistics,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Drops degree-0 nodes (and any edge still pointing at one).
    pub fn without_isolated(self) -> Self {
        let nodes = self
            .nodes
            .into_iter()
            .filter(|node| node.degree > 0)
            .collect::<Vec<_>>();
        let kept = nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        let edges = self
            .edges
            .into_iter()
            .filter(|edge| kept.contains(edge.source.as_str()) && kept.contains(edge.target.as_str()))
            .collect::<Vec<_>>();

        Self::new(nodes, edges)
    }
}

/// Read-only lookup from node id to its position in a snapshot, plus the
/// edges incident to every node. Built once per snapshot.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex {
    index_by_id: HashMap<String, usize>,
    incident: Vec<Vec<usize>>,
}

impl NodeIndex {
    pub fn build(snapshot: &GraphSnapshot) -> Self {
        let mut index_by_id = HashMap::with_capacity(snapshot.nodes.len());
        for (index, node) in snapshot.nodes.iter().enumerate() {
            index_by_id.entry(node.id.clone()).or_insert(index);
        }

        let mut incident = vec![Vec::new(); snapshot.nodes.len()];
        for (edge_index, edge) in snapshot.edges.iter().enumerate() {
            let source = index_by_id.get(&edge.source).copied();
            let target = index_by_id.get(&edge.target).copied();

            if let Some(source) = source {
                incident[source].push(edge_index);
            }
            if let Some(target) = target
                && source != Some(target)
            {
                incident[target].push(edge_index);
            }
        }

        Self {
            index_by_id,
            incident,
        }
    }

    pub fn len(&self) -> usize {
        self.index_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node<'a>(&self, snapshot: &'a GraphSnapshot, id: &str) -> Option<&'a Node> {
        self.get(id).and_then(|index| snapshot.nodes.get(index))
    }

    /// Ids of the nodes sharing an edge with `id`, in edge order.
    pub fn neighbors<'a>(&self, snapshot: &'a GraphSnapshot, id: &str) -> Vec<&'a str> {
        let Some(index) = self.get(id) else {
            return Vec::new();
        };

        self.incident[index]
            .iter()
            .filter_map(|&edge_index| snapshot.edges.get(edge_index))
            .map(|edge| {
                if edge.source == id {
                    edge.target.as_str()
                } else {
                    edge.source.as_str()
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn node(id: &str, community: u32, degree: u32) -> Node {
    Node {
        id: id.to_owned(),
        label: id.to_uppercase(),
        community,
        degree,
        size: Node::default_size(degree),
        institution: None,
        department: None,
        expertise: Vec::new(),
        total_projects: 0,
    }
}

#[cfg(test)]
pub(crate) fn edge(source: &str, target: &str, weight: f32) -> Edge {
    Edge {
        source: source.to_owned(),
        target: target.to_owned(),
        weight,
    }
}
