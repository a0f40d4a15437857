mod graph;
mod parse;
mod source;

pub use graph::{DEFAULT_COMMUNITY, Edge, GraphSnapshot, NetworkStatistics, Node, NodeIndex};
pub use parse::parse_network_payload;
pub(crate) use parse::{RawId, clean_terms};
pub use source::{CachedSource, FileSource, GraphSource, SnapshotRequest};

#[cfg(test)]
pub(crate) use graph::{edge, node};
