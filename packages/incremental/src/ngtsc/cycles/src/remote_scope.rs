// Remote Scoping
//
// A component declared by an NgModule normally receives its compilation scope
// in its own file. When importing the scope's declarations into that file
// would close a reference cycle, the module's file assigns the scope instead.
// Whenever that arrangement changes shape, both sides must be re-emitted,
// even if no public API changed.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

use super::analyzer::CycleAnalyzer;
use crate::ngtsc::incremental::semantic_graph::src::api::{
    SymbolId, SymbolIdentity, SymbolKey, SymbolKind,
};
use crate::ngtsc::incremental::semantic_graph::src::graph::SemanticDepGraph;

/// The remotely scoped components of every module in one generation.
#[derive(Debug, Clone, Default)]
pub struct RemoteScopeAnalysis {
    scopes: BTreeMap<SymbolId, BTreeSet<SymbolId>>,
}

impl RemoteScopeAnalysis {
    /// A component is remotely scoped by a module that declares it when the
    /// two share a cycle of the remote-scope graph, i.e. `RemoteScopeCycle`
    /// edges (from either side) lead from the component back to the module.
    pub fn analyze(graph: &SemanticDepGraph) -> Self {
        let cycles = CycleAnalyzer::remote_scope(graph);
        let mut scopes: BTreeMap<SymbolId, BTreeSet<SymbolId>> = BTreeMap::new();

        for (module, symbol) in graph.symbols() {
            let SymbolKind::NgModule(meta) = &symbol.kind else {
                continue;
            };
            for component in meta.declarations.iter().filter_map(|key| graph.id_of(key)) {
                if graph.symbol(component).kind.is_component() && cycles.in_same_cycle(module, component) {
                    scopes.entry(module).or_default().insert(component);
                }
            }
        }

        Self { scopes }
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn is_remotely_scoped(&self, component: SymbolId) -> bool {
        self.scopes.values().any(|components| components.contains(&component))
    }

    pub fn components_of(&self, module: SymbolId) -> Option<&BTreeSet<SymbolId>> {
        self.scopes.get(&module)
    }

    pub fn scopes(&self) -> impl Iterator<Item = (SymbolId, &BTreeSet<SymbolId>)> {
        self.scopes.iter().map(|(module, components)| (*module, components))
    }
}

/// Symbols of `current` that must be re-emitted because remote scoping
/// changed between generations.
///
/// For every module whose remotely scoped set differs (newly cyclic, no
/// longer cyclic, or different members), the module and each component that
/// entered or left the set are returned. Untrackable members force the whole
/// set. Without a previous generation every remotely scoped symbol is
/// returned.
#[instrument(skip_all, fields(symbols = current.len()))]
pub fn resolve_remote_scope_fixups(
    current: &SemanticDepGraph,
    previous: Option<&SemanticDepGraph>,
) -> BTreeSet<SymbolKey> {
    let analysis = RemoteScopeAnalysis::analyze(current);
    let mut fixups: BTreeSet<SymbolId> = BTreeSet::new();

    let Some(previous) = previous else {
        for (module, components) in analysis.scopes() {
            fixups.insert(module);
            fixups.extend(components.iter().copied());
        }
        return to_keys(current, &fixups);
    };

    let mut prior_scopes: BTreeMap<SymbolIdentity, BTreeSet<Option<SymbolIdentity>>> =
        BTreeMap::new();
    for (module, components) in RemoteScopeAnalysis::analyze(previous).scopes() {
        if let Some(identity) = previous.symbol(module).identity() {
            let members = components
                .iter()
                .map(|component| previous.symbol(*component).identity())
                .collect();
            prior_scopes.insert(identity, members);
        }
    }

    for (module, components) in analysis.scopes() {
        let members: BTreeSet<Option<SymbolIdentity>> = components
            .iter()
            .map(|component| current.symbol(*component).identity())
            .collect();
        let prior = current
            .symbol(module)
            .identity()
            .and_then(|identity| prior_scopes.remove(&identity));

        let Some(prior) = prior else {
            debug!(module = %current.symbol(module).key(), "module newly remote-scopes components");
            fixups.insert(module);
            fixups.extend(components.iter().copied());
            continue;
        };

        let untrackable = members.contains(&None) || prior.contains(&None);
        if !untrackable && prior == members {
            continue;
        }

        debug!(module = %current.symbol(module).key(), untrackable, "remote scope changed");
        fixups.insert(module);
        for component in components {
            let identity = current.symbol(*component).identity();
            if untrackable || !prior.contains(&identity) {
                fixups.insert(*component);
            }
        }
        for former in prior.iter().flatten() {
            if !members.contains(&Some(former.clone())) {
                fixups.extend(current.id_by_identity(former));
            }
        }
    }

    // Modules that no longer remote-scope anything.
    for (module, prior) in prior_scopes {
        if let Some(id) = current.id_by_identity(&module) {
            debug!(module = %current.symbol(id).key(), "module stopped remote-scoping");
            fixups.insert(id);
        }
        for former in prior.iter().flatten() {
            fixups.extend(current.id_by_identity(former));
        }
    }

    to_keys(current, &fixups)
}

fn to_keys(graph: &SemanticDepGraph, ids: &BTreeSet<SymbolId>) -> BTreeSet<SymbolKey> {
    ids.iter().map(|id| graph.symbol(*id).key()).collect()
}
