// Emit Propagation
//
// Fixpoint that turns the public-API seed into the full set of symbols whose
// previously emitted output can no longer be reused.

use std::collections::BTreeSet;
use tracing::{debug, instrument, trace};

use super::api::{AffectedReason, AffectedSet, EdgeKind, EmitContext, SymbolId, SymbolKey, SymbolKind};
use super::diff::compute_type_check_api_affected;
use super::graph::SemanticDepGraph;
use crate::ngtsc::file_system::AbsoluteFsPath;

/// Result of [`compute_emit_affected`].
#[derive(Debug, Clone, Default)]
pub struct EmitAffected {
    /// Symbols whose emit must be regenerated.
    pub symbols: BTreeSet<SymbolKey>,
    /// The public-API-affected set after propagation through module exports.
    pub public_api_affected: BTreeSet<SymbolKey>,
    pub stats: PropagationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationStats {
    /// Number of scans that added at least one symbol to either set.
    pub iterations: usize,
    /// Size of the emit-affected set before the first scan and after each
    /// growing scan.
    pub growth: Vec<usize>,
}

/// In-graph form of a finished propagation.
pub(crate) struct Propagation {
    pub emit_affected: AffectedSet,
    pub public_api_affected: AffectedSet,
    pub stats: PropagationStats,
}

/// Determines every symbol of `current` that is emit-affected, given the
/// public-API seed computed by the diff.
///
/// Keys in `public_api_affected` that are not part of `current` are ignored.
pub fn compute_emit_affected(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    public_api_affected: &BTreeSet<SymbolKey>,
) -> EmitAffected {
    let mut seed = AffectedSet::new(current.len());
    for key in public_api_affected {
        match current.id_of(key) {
            Some(id) => {
                let reason = match previous.equivalent_of(current.symbol(id)) {
                    Some(_) => AffectedReason::PUBLIC_API,
                    None => AffectedReason::NEW_SYMBOL,
                };
                seed.mark(id, reason);
            }
            None => debug!(symbol = %key, "ignoring seed symbol outside of the current graph"),
        }
    }

    let propagation = propagate(current, previous, seed);
    EmitAffected {
        symbols: propagation.emit_affected.to_keys(current),
        public_api_affected: propagation.public_api_affected.to_keys(current),
        stats: propagation.stats,
    }
}

#[instrument(skip_all, fields(symbols = current.len(), seed = seed.len()))]
pub(crate) fn propagate(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    seed: AffectedSet,
) -> Propagation {
    // A new symbol is re-emitted, but has no previous API to differ from.
    // Consumers that start using it show up through their edge sets.
    let mut public_api = AffectedSet::new(current.len());
    for id in seed.ids() {
        let reason = seed.reason(id) - AffectedReason::NEW_SYMBOL;
        if !reason.is_empty() {
            public_api.mark(id, reason);
        }
    }
    for (id, symbol) in current.symbols() {
        if !symbol.has_identity() {
            public_api.mark(id, AffectedReason::NO_IDENTITY);
        }
    }

    let mut emit = seed;
    for id in public_api.ids() {
        emit.mark(id, public_api.reason(id));
    }
    let prior_ids: Vec<Option<SymbolId>> = current
        .symbols()
        .map(|(_, symbol)| previous.equivalent_of(symbol))
        .collect();

    // Edge sets do not depend on the affected sets; compare them once.
    for id in current.ids() {
        if emit.contains(id) {
            continue;
        }
        match prior_ids[id.index()] {
            None => {
                emit.mark(id, AffectedReason::NEW_SYMBOL);
            }
            Some(prior) if edges_changed(current, id, previous, prior) => {
                trace!(symbol = %current.symbol(id).key(), "edge set changed");
                emit.mark(id, AffectedReason::EDGES_CHANGED);
            }
            Some(_) => {}
        }
    }

    let mut stats = PropagationStats {
        iterations: 0,
        growth: vec![emit.len()],
    };

    loop {
        let mut grew = false;

        for id in current.ids() {
            let symbol = current.symbol(id);

            if !public_api.contains(id) && exports_public_api_affected(current, id, &public_api) {
                // The module's own emit is unchanged; only its consumers see
                // the new surface.
                public_api.mark(id, AffectedReason::EXPORTED_DEPENDENCY);
                grew = true;
                continue;
            }

            if emit.contains(id) {
                continue;
            }
            let Some(prior) = prior_ids[id.index()] else {
                continue;
            };
            let ctx = EmitContext {
                current,
                current_id: id,
                public_api_affected: &public_api,
            };
            if symbol.is_emit_affected(previous.symbol(prior), &ctx) {
                trace!(symbol = %symbol.key(), "emit affected through a dependency");
                emit.mark(id, AffectedReason::DEPENDENCY);
                grew = true;
            }
        }

        if !grew {
            break;
        }
        stats.iterations += 1;
        stats.growth.push(emit.len());
    }

    debug!(
        emit_affected = emit.len(),
        public_api_affected = public_api.len(),
        iterations = stats.iterations,
        "propagation reached fixpoint"
    );
    Propagation {
        emit_affected: emit,
        public_api_affected: public_api,
        stats,
    }
}

/// Whether the outgoing edges of a symbol, resolved to identities, differ
/// between generations. Covers template matches gained or lost as well as
/// changed explicit references. Remote-scope edges are left to the
/// remote-scope resolver.
fn edges_changed(
    current: &SemanticDepGraph,
    id: SymbolId,
    previous: &SemanticDepGraph,
    prior: SymbolId,
) -> bool {
    let is_use = |kind: EdgeKind| kind != EdgeKind::RemoteScopeCycle;
    match (
        current.edge_identities(id, is_use),
        previous.edge_identities(prior, is_use),
    ) {
        (Some(current), Some(previous)) => current != previous,
        _ => true,
    }
}

/// A module re-exposes the public API of everything it exports, so it is
/// public-API-affected as soon as one of its exports is.
fn exports_public_api_affected(
    graph: &SemanticDepGraph,
    id: SymbolId,
    public_api: &AffectedSet,
) -> bool {
    match &graph.symbol(id).kind {
        SymbolKind::NgModule(module) => module
            .exports
            .iter()
            .filter_map(|key| graph.id_of(key))
            .any(|export| export != id && public_api.contains(export)),
        _ => false,
    }
}

/// Components whose type-check block must be regenerated.
pub fn compute_type_check_affected(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    changed_units: &BTreeSet<AbsoluteFsPath>,
) -> BTreeSet<SymbolKey> {
    let type_check_api = compute_type_check_api_affected(current, previous, changed_units);
    let is_match = |kind: EdgeKind| kind == EdgeKind::TemplateMatch;

    current
        .symbols()
        .filter_map(|(id, symbol)| {
            let SymbolKind::Component(component) = &symbol.kind else {
                return None;
            };
            let affected = type_check_api.contains(id)
                || match previous.equivalent_of(symbol) {
                    None => true,
                    Some(prior) => {
                        let matches = current.edge_identities(id, is_match);
                        matches.is_none()
                            || matches != previous.edge_identities(prior, is_match)
                            || component.is_type_check_block_affected(current, id, &type_check_api)
                    }
                };
            affected.then(|| symbol.key())
        })
        .collect()
}
