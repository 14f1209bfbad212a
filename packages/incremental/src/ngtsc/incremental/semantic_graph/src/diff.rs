// Semantic Diff
//
// Compares every symbol of the current generation against its equivalent in
// the previous generation and collects those whose public API changed.

use std::collections::BTreeSet;
use tracing::{debug, instrument, trace};

use super::api::{AffectedReason, AffectedSet, DiffContext, SymbolKey};
use super::graph::SemanticDepGraph;
use crate::ngtsc::file_system::AbsoluteFsPath;

/// Computes the propagation seed: symbols that are new, unidentifiable, or
/// whose public API differs from their previous-generation equivalent.
///
/// Symbols that only exist in `previous` are never part of the result; their
/// removal shows up as a changed edge set of their former consumers.
pub fn compute_changed_symbols(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    changed_units: &BTreeSet<AbsoluteFsPath>,
) -> BTreeSet<SymbolKey> {
    compute_public_api_affected(current, previous, changed_units).to_keys(current)
}

#[instrument(skip_all, fields(symbols = current.len()))]
pub(crate) fn compute_public_api_affected(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    changed_units: &BTreeSet<AbsoluteFsPath>,
) -> AffectedSet {
    let ctx = DiffContext::new(current, previous, changed_units);
    let mut affected = AffectedSet::new(current.len());

    for (id, symbol) in current.symbols() {
        let reason = if !symbol.has_identity() {
            AffectedReason::NO_IDENTITY
        } else {
            match previous.equivalent_of(symbol) {
                None => AffectedReason::NEW_SYMBOL,
                Some(prior) if symbol.is_public_api_affected(previous.symbol(prior), &ctx) => {
                    AffectedReason::PUBLIC_API
                }
                Some(_) => continue,
            }
        };
        trace!(symbol = %symbol.key(), ?reason, "public API affected");
        affected.mark(id, reason);
    }

    debug!(affected = affected.len(), "computed public API changes");
    affected
}

/// Symbols whose type-check API changed. Superset of the public-API seed.
pub(crate) fn compute_type_check_api_affected(
    current: &SemanticDepGraph,
    previous: &SemanticDepGraph,
    changed_units: &BTreeSet<AbsoluteFsPath>,
) -> AffectedSet {
    let ctx = DiffContext::new(current, previous, changed_units);
    let mut affected = AffectedSet::new(current.len());

    for (id, symbol) in current.symbols() {
        if !symbol.has_identity() {
            affected.mark(id, AffectedReason::NO_IDENTITY);
            continue;
        }
        match previous.equivalent_of(symbol) {
            None => {
                affected.mark(id, AffectedReason::NEW_SYMBOL);
            }
            Some(prior) => {
                if symbol.is_type_check_api_affected(previous.symbol(prior), &ctx) {
                    affected.mark(id, AffectedReason::PUBLIC_API);
                }
            }
        }
    }
    affected
}
