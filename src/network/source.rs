use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::graph::GraphSnapshot;
use super::parse::parse_network_payload;
use crate::error::{Error, Result};

/// Flags forwarded to the analytics service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotRequest {
    /// Keep researchers with no collaborations.
    pub include_isolated: bool,
    /// Rebuild from source instead of serving a cached graph.
    pub force_rebuild: bool,
}

pub trait GraphSource {
    fn fetch(&mut self, request: &SnapshotRequest) -> Result<GraphSnapshot>;
}

/// Reads an analytics envelope from a JSON file on every fetch.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphSource for FileSource {
    fn fetch(&mut self, request: &SnapshotRequest) -> Result<GraphSnapshot> {
        let raw = fs::read_to_string(&self.path).map_err(|error| {
            Error::DataUnavailable(format!("failed to read {}: {error}", self.path.display()))
        })?;
        let snapshot = parse_network_payload(&raw)?;

        let snapshot = if request.include_isolated {
            snapshot
        } else {
            snapshot.without_isolated()
        };

        debug!(
            path = %self.path.display(),
            nodes = snapshot.node_count(),
            edges = snapshot.edge_count(),
            "read network snapshot"
        );
        Ok(snapshot)
    }
}

/// Serves the last snapshot again until the caller forces a rebuild or asks
/// for a different `include_isolated` view.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cached: Option<(bool, GraphSnapshot)>,
}

impl<S: GraphSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: None,
        }
    }

    pub fn is_cached(&self, include_isolated: bool) -> bool {
        matches!(&self.cached, Some((key, _)) if *key == include_isolated)
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: GraphSource> GraphSource for CachedSource<S> {
    fn fetch(&mut self, request: &SnapshotRequest) -> Result<GraphSnapshot> {
        if !request.force_rebuild
            && let Some((key, snapshot)) = &self.cached
            && *key == request.include_isolated
        {
            info!(
                include_isolated = request.include_isolated,
                "returning cached collaboration network"
            );
            return Ok(snapshot.clone());
        }

        info!(
            include_isolated = request.include_isolated,
            force_rebuild = request.force_rebuild,
            "building fresh collaboration network"
        );
        let snapshot = self.inner.fetch(request)?;
        self.cached = Some((request.include_isolated, snapshot.clone()));
        Ok(snapshot)
    }
}
