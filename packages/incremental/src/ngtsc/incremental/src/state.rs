// Incremental State
//
// Tracks the state of compilation for incremental builds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::error::{IncrementalError, Result};
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::api::{SemanticSymbol, SymbolEdge};
use crate::ngtsc::incremental::semantic_graph::src::graph::SemanticDepGraph;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of a semantic graph, for carrying the previous generation
/// across processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub files: Vec<AbsoluteFsPath>,
    pub symbols: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub symbol: SemanticSymbol,
    #[serde(default)]
    pub edges: Vec<SymbolEdge>,
}

impl GraphSnapshot {
    pub fn capture(graph: &SemanticDepGraph) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            files: graph.files().iter().cloned().collect(),
            symbols: graph
                .entries()
                .map(|(symbol, edges)| SnapshotEntry {
                    symbol: symbol.clone(),
                    edges: edges.to_vec(),
                })
                .collect(),
        }
    }

    /// Rebuilds the graph, re-validating it like a freshly built one.
    pub fn restore(self) -> Result<SemanticDepGraph> {
        if self.version != SNAPSHOT_VERSION {
            return Err(IncrementalError::SnapshotVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let entries = self
            .symbols
            .into_iter()
            .map(|entry| (entry.symbol, entry.edges.into_iter().collect()))
            .collect();
        SemanticDepGraph::from_parts(entries, self.files)
    }
}

/// State carried from one compilation pass to the next.
///
/// Only the last successful generation is kept. A failed pass leaves it
/// untouched and remembers its changed units, since their output was never
/// written.
#[derive(Debug, Clone, Default)]
pub struct IncrementalState {
    previous: Option<SemanticDepGraph>,
    pending_changes: BTreeSet<AbsoluteFsPath>,
    successful_passes: u64,
}

impl IncrementalState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize with the graph of a prior successful build.
    pub fn with_previous(graph: SemanticDepGraph) -> Self {
        Self {
            previous: Some(graph),
            ..Self::default()
        }
    }

    pub fn previous(&self) -> Option<&SemanticDepGraph> {
        self.previous.as_ref()
    }

    /// Units changed in failed passes since the last successful one.
    pub fn pending_changes(&self) -> &BTreeSet<AbsoluteFsPath> {
        &self.pending_changes
    }

    pub fn successful_passes(&self) -> u64 {
        self.successful_passes
    }

    /// The pass completed; its graph becomes the previous generation.
    pub fn record_successful_pass(&mut self, graph: SemanticDepGraph) {
        self.previous = Some(graph);
        self.pending_changes.clear();
        self.successful_passes += 1;
        debug!(pass = self.successful_passes, "recorded successful pass");
    }

    /// The pass failed; keep the previous generation as it was.
    pub fn record_failed_pass(&mut self, changed_units: impl IntoIterator<Item = AbsoluteFsPath>) {
        self.pending_changes.extend(changed_units);
        debug!(pending = self.pending_changes.len(), "recorded failed pass");
    }

    /// Forgets the previous generation, forcing the next pass to rebuild
    /// everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
        self.pending_changes.clear();
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let Some(graph) = &self.previous else {
            return Ok(());
        };
        let json = serde_json::to_string(&GraphSnapshot::capture(graph))?;
        fs::write(path, json).map_err(|source| IncrementalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), symbols = graph.len(), "saved graph snapshot");
        Ok(())
    }

    pub fn load_snapshot(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| IncrementalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: GraphSnapshot = serde_json::from_str(&json)?;
        let graph = snapshot.restore()?;
        info!(path = %path.display(), symbols = graph.len(), "loaded graph snapshot");
        Ok(Self::with_previous(graph))
    }
}
