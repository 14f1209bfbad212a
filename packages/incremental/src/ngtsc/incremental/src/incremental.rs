// Incremental Compilation
//
// Drives one compilation pass: builds the current graph, compares it with the
// previous generation and decides which units must be re-emitted.

use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use super::api::{InvalidationResult, ReemitPlan};
use super::error::Result;
use super::state::IncrementalState;
use crate::config::IncrementalOptions;
use crate::ngtsc::cycles::resolve_remote_scope_fixups;
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::semantic_graph::src::api::SymbolKey;
use crate::ngtsc::incremental::semantic_graph::src::diff::compute_public_api_affected;
use crate::ngtsc::incremental::semantic_graph::src::graph::{build_graph_with, SemanticDepGraph};
use crate::ngtsc::incremental::semantic_graph::src::propagation::{
    compute_type_check_affected, propagate,
};
use crate::ngtsc::reflection::SourceUnit;

/// Diffs `current` against `previous` and collects every unit that must be
/// re-emitted: the directly changed units, the files of emit-affected
/// symbols, and the remote-scope fixups.
///
/// Directly changed units that no longer exist in `current` are dropped;
/// there is nothing left to emit for them.
#[instrument(skip_all, fields(symbols = current.len(), changed = directly_changed.len()))]
pub fn diff_and_propagate(
    current: &SemanticDepGraph,
    previous: Option<&SemanticDepGraph>,
    directly_changed: &BTreeSet<AbsoluteFsPath>,
) -> InvalidationResult {
    let Some(previous) = previous else {
        debug!("no previous generation, rebuilding everything");
        return full_rebuild(current);
    };

    let directly_changed: BTreeSet<AbsoluteFsPath> = directly_changed
        .intersection(current.files())
        .cloned()
        .collect();

    let seed = compute_public_api_affected(current, previous, &directly_changed);
    let propagation = propagate(current, previous, seed);
    let remote_scope_fixups = resolve_remote_scope_fixups(current, Some(previous));
    let type_check_affected = compute_type_check_affected(current, previous, &directly_changed);

    let emit_affected = propagation.emit_affected.to_keys(current);
    let mut changed_units = directly_changed.clone();
    changed_units.extend(files_of(&emit_affected));
    changed_units.extend(files_of(&remote_scope_fixups));

    let mut type_check_units = directly_changed;
    type_check_units.extend(files_of(&type_check_affected));

    info!(
        reemit = changed_units.len(),
        emit_affected = emit_affected.len(),
        remote_scope_fixups = remote_scope_fixups.len(),
        "computed incremental re-emit set"
    );

    InvalidationResult {
        changed_units,
        type_check_units,
        public_api_affected: propagation.public_api_affected.to_keys(current),
        emit_affected,
        remote_scope_fixups,
        full_rebuild: false,
        stats: propagation.stats,
    }
}

fn full_rebuild(current: &SemanticDepGraph) -> InvalidationResult {
    let all: BTreeSet<SymbolKey> = current.symbols().map(|(_, symbol)| symbol.key()).collect();

    InvalidationResult {
        changed_units: current.files().clone(),
        type_check_units: current.files().clone(),
        public_api_affected: all.clone(),
        emit_affected: all,
        remote_scope_fixups: resolve_remote_scope_fixups(current, None),
        full_rebuild: true,
        stats: Default::default(),
    }
}

fn files_of(keys: &BTreeSet<SymbolKey>) -> impl Iterator<Item = AbsoluteFsPath> + '_ {
    keys.iter().map(|key| key.path.clone())
}

/// A pass whose plan has been computed but whose outcome is not known yet.
#[derive(Debug)]
pub struct PendingPass {
    graph: Option<SemanticDepGraph>,
    changed: BTreeSet<AbsoluteFsPath>,
    result: InvalidationResult,
}

impl PendingPass {
    pub fn result(&self) -> &InvalidationResult {
        &self.result
    }

    pub fn plan(&self) -> ReemitPlan {
        ReemitPlan::from(&self.result)
    }

    pub fn graph(&self) -> Option<&SemanticDepGraph> {
        self.graph.as_ref()
    }
}

/// Incremental compilation driver state, carried across passes.
#[derive(Debug)]
pub struct IncrementalCompilation {
    options: IncrementalOptions,
    state: IncrementalState,
}

impl IncrementalCompilation {
    /// No prior build: the first pass re-emits everything.
    pub fn fresh(options: IncrementalOptions) -> Self {
        Self {
            options,
            state: IncrementalState::new(),
        }
    }

    pub fn incremental(options: IncrementalOptions, state: IncrementalState) -> Self {
        Self { options, state }
    }

    /// Resumes from the snapshot configured in `options`, if one can be
    /// loaded. An unreadable or stale snapshot only costs a full rebuild.
    pub fn from_options(options: IncrementalOptions) -> Self {
        let state = match &options.snapshot_path {
            Some(path) if path.exists() => IncrementalState::load_snapshot(path).unwrap_or_else(|err| {
                warn!(%err, "ignoring unusable graph snapshot");
                IncrementalState::new()
            }),
            _ => IncrementalState::new(),
        };
        Self { options, state }
    }

    pub fn options(&self) -> &IncrementalOptions {
        &self.options
    }

    pub fn state(&self) -> &IncrementalState {
        &self.state
    }

    /// Builds the current graph and computes what this pass must re-emit.
    ///
    /// Units changed during earlier failed passes are treated as changed
    /// again. If the graph cannot be built consistently, every unit is
    /// re-emitted.
    #[instrument(skip_all, fields(units = units.len()))]
    pub fn begin_pass(&self, units: &[SourceUnit], changed: &BTreeSet<AbsoluteFsPath>) -> PendingPass {
        let mut changed = changed.clone();
        changed.extend(self.state.pending_changes().iter().cloned());

        match build_graph_with(units, self.options.parallel_graph_construction) {
            Ok(graph) => {
                let result = diff_and_propagate(&graph, self.state.previous(), &changed);
                PendingPass {
                    graph: Some(graph),
                    changed,
                    result,
                }
            }
            Err(err) => {
                warn!(%err, "semantic graph is unusable, falling back to a full rebuild");
                let mut all: BTreeSet<AbsoluteFsPath> = units.iter().map(|u| u.path.clone()).collect();
                all.extend(changed.iter().cloned());
                PendingPass {
                    graph: None,
                    changed,
                    result: InvalidationResult {
                        type_check_units: all.clone(),
                        changed_units: all,
                        full_rebuild: true,
                        ..InvalidationResult::default()
                    },
                }
            }
        }
    }

    /// The driver emitted the plan successfully.
    pub fn record_successful_pass(&mut self, pass: PendingPass) {
        match pass.graph {
            Some(graph) => self.state.record_successful_pass(graph),
            // Everything was emitted, but there is no trustworthy graph to
            // compare the next pass against.
            None => self.state.invalidate(),
        }
    }

    /// The pass failed; the previous generation stays in place.
    pub fn record_failed_pass(&mut self, pass: PendingPass) {
        self.state.record_failed_pass(pass.changed);
    }

    /// Persists the previous generation to the configured snapshot path.
    pub fn save_snapshot(&self) -> Result<()> {
        match &self.options.snapshot_path {
            Some(path) => self.state.save_snapshot(path),
            None => Ok(()),
        }
    }
}
