use std::collections::HashSet;

use serde::Deserialize;
use tracing::warn;

use super::graph::{DEFAULT_COMMUNITY, Edge, GraphSnapshot, NetworkStatistics, Node};
use crate::error::{Error, Result};

/// Ids arrive as integers from the analytics service and as strings
/// everywhere else.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Int(i64),
    Text(String),
}

impl RawId {
    pub(crate) fn into_string(self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(value) => value.trim().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Option<RawNetwork>,
    #[serde(default)]
    error: Option<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawNetwork {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
    #[serde(default)]
    statistics: Option<NetworkStatistics>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: RawId,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    community: Option<u32>,
    #[serde(default)]
    degree: Option<u32>,
    #[serde(default)]
    size: Option<f32>,
    #[serde(default)]
    institution: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    expertise: Vec<String>,
    #[serde(default)]
    total_projects: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    source: RawId,
    target: RawId,
    #[serde(default)]
    weight: Option<f32>,
}

pub(crate) fn clean_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|term| term.trim().to_owned())
        .filter(|term| !term.is_empty())
        .collect()
}

impl RawNode {
    fn into_node(self) -> Node {
        let id = self.id.into_string();
        let degree = self.degree.unwrap_or(0);
        let size = self
            .size
            .filter(|size| size.is_finite())
            .unwrap_or_else(|| Node::default_size(degree));

        Node {
            label: self
                .label
                .filter(|label| !label.trim().is_empty())
                .unwrap_or_else(|| id.clone()),
            id,
            community: self.community.unwrap_or(DEFAULT_COMMUNITY),
            degree,
            size,
            institution: self.institution,
            department: self.department,
            expertise: clean_terms(self.expertise),
            total_projects: self.total_projects.unwrap_or(0),
        }
    }
}

/// Decodes an analytics network envelope into a snapshot.
pub fn parse_network_payload(raw: &str) -> Result<GraphSnapshot> {
    let envelope: RawEnvelope = serde_json::from_str(raw)
        .map_err(|error| Error::DataUnavailable(format!("invalid network JSON: {error}")))?;

    if !envelope.success {
        let reason = envelope.error.unwrap_or_else(|| "unknown error".to_owned());
        return Err(Error::DataUnavailable(reason));
    }

    let data = envelope
        .data
        .ok_or_else(|| Error::DataUnavailable("network payload has no data".to_owned()))?;

    let mut dropped = 0usize;
    let mut seen = HashSet::with_capacity(data.nodes.len());
    let mut nodes = Vec::with_capacity(data.nodes.len());
    for raw_node in data.nodes {
        let node = raw_node.into_node();
        if node.id.is_empty() {
            warn!("dropping node with empty id");
            dropped += 1;
            continue;
        }
        if !seen.insert(node.id.clone()) {
            warn!(id = %node.id, "dropping duplicate node");
            dropped += 1;
            continue;
        }
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(data.edges.len());
    for raw_edge in data.edges {
        let source = raw_edge.source.into_string();
        let target = raw_edge.target.into_string();
        let weight = raw_edge.weight.unwrap_or(1.0);

        if !seen.contains(&source) || !seen.contains(&target) {
            warn!(%source, %target, "dropping edge with unknown endpoint");
            dropped += 1;
            continue;
        }
        if !weight.is_finite() || weight <= 0.0 {
            warn!(%source, %target, weight, "dropping edge with non-positive weight");
            dropped += 1;
            continue;
        }

        edges.push(Edge {
            source,
            target,
            weight,
        });
    }

    // Payload statistics only hold when nothing was dropped.
    let mut snapshot = GraphSnapshot::new(nodes, edges);
    if let Some(statistics) = data.statistics
        && dropped == 0
    {
        snapshot.statistics = statistics;
    }
    Ok(snapshot)
}
