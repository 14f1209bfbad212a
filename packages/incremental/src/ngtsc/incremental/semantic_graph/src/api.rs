// Semantic Dependency Graph API
//
// Types for tracking semantic dependencies between symbols.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::graph::SemanticDepGraph;
use crate::ngtsc::annotations::component::src::symbol::ComponentSymbol;
use crate::ngtsc::annotations::directive::src::symbol::DirectiveSymbol;
use crate::ngtsc::annotations::ng_module::src::symbol::NgModuleSymbol;
use crate::ngtsc::annotations::pipe::src::symbol::PipeSymbol;
use crate::ngtsc::file_system::AbsoluteFsPath;

/// Locates a declaration within a single generation: its file plus its local
/// name. Never used to match symbols across generations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolKey {
    pub path: AbsoluteFsPath,
    pub name: String,
}

impl SymbolKey {
    pub fn new(path: impl Into<AbsoluteFsPath>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.name)
    }
}

/// The cross-generation identity of a symbol: `(path, identifier)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolIdentity {
    pub path: AbsoluteFsPath,
    pub identifier: String,
}

/// Index of a symbol within one `SemanticDepGraph`. Meaningless in any other
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How one symbol uses another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Explicit import or use (NgModule declarations/imports/exports,
    /// standalone imports, host directives, base classes).
    DirectReference,
    /// A consumer's template matched the target by selector or pipe name.
    TemplateMatch,
    /// A circular reference that forces remote scoping.
    RemoteScopeCycle,
}

/// A directed "uses" edge. Targets are addressed by key so that edges of two
/// generations can be compared even though their nodes are distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolEdge {
    pub target: SymbolKey,
    pub kind: EdgeKind,
}

/// Metadata of an opaque symbol: a declaration this crate does not introspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueSymbol {
    pub fingerprint: Option<String>,
}

impl OpaqueSymbol {
    /// Opaque symbols are only considered unchanged when that is provable.
    /// Fingerprints from both generations decide on their own; without them
    /// the symbol is unchanged only if its unit was not invalidated.
    pub fn is_public_api_affected(&self, previous: &OpaqueSymbol, unit_changed: bool) -> bool {
        match (&self.fingerprint, &previous.fingerprint) {
            (Some(current), Some(prior)) => current != prior,
            _ => unit_changed,
        }
    }
}

/// Kind-specific metadata of a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SymbolKind {
    Directive(DirectiveSymbol),
    Component(ComponentSymbol),
    Pipe(PipeSymbol),
    NgModule(NgModuleSymbol),
    Opaque(OpaqueSymbol),
}

/// Result of looking up a pair of kinds in the cross-kind policy matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossKindPolicy {
    /// Both kinds are the same; compare with the variant's own logic.
    SameKind,
    /// The kinds differ but share a comparable directive surface.
    CompareDirectiveSurface,
    /// No narrowing rule exists; the change is always observable.
    Affected,
}

impl SymbolKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SymbolKind::Directive(_) => "directive",
            SymbolKind::Component(_) => "component",
            SymbolKind::Pipe(_) => "pipe",
            SymbolKind::NgModule(_) => "ngModule",
            SymbolKind::Opaque(_) => "opaque",
        }
    }

    /// The directive surface of directive-like symbols.
    pub fn as_directive(&self) -> Option<&DirectiveSymbol> {
        match self {
            SymbolKind::Directive(dir) => Some(dir),
            SymbolKind::Component(cmp) => Some(&cmp.directive),
            _ => None,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, SymbolKind::Component(_))
    }

    pub fn is_ng_module(&self) -> bool {
        matches!(self, SymbolKind::NgModule(_))
    }

    /// Policy for a symbol whose kind changed between generations.
    ///
    /// Directive and component both expose the same directive surface to
    /// consumers, so a transition between them is compared field-wise. Every
    /// other pair is affected.
    pub fn cross_kind_policy(&self, previous: &SymbolKind) -> CrossKindPolicy {
        use SymbolKind::*;
        match (previous, self) {
            (Directive(_), Directive(_))
            | (Component(_), Component(_))
            | (Pipe(_), Pipe(_))
            | (NgModule(_), NgModule(_))
            | (Opaque(_), Opaque(_)) => CrossKindPolicy::SameKind,
            (Directive(_), Component(_)) | (Component(_), Directive(_)) => {
                CrossKindPolicy::CompareDirectiveSurface
            }
            _ => CrossKindPolicy::Affected,
        }
    }
}

/// A symbol of one build generation. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSymbol {
    pub path: AbsoluteFsPath,
    pub name: String,
    /// `None` when the declaration cannot be tracked across builds.
    pub identifier: Option<String>,
    pub kind: SymbolKind,
}

impl SemanticSymbol {
    pub fn key(&self) -> SymbolKey {
        SymbolKey::new(self.path.clone(), self.name.clone())
    }

    pub fn identity(&self) -> Option<SymbolIdentity> {
        self.identifier.as_ref().map(|identifier| SymbolIdentity {
            path: self.path.clone(),
            identifier: identifier.clone(),
        })
    }

    pub fn has_identity(&self) -> bool {
        self.identifier.is_some()
    }

    /// Whether consumers of this symbol may observe a difference compared to
    /// `previous`, the same-identity symbol of the prior generation.
    pub fn is_public_api_affected(&self, previous: &SemanticSymbol, ctx: &DiffContext<'_>) -> bool {
        match self.kind.cross_kind_policy(&previous.kind) {
            CrossKindPolicy::Affected => true,
            CrossKindPolicy::CompareDirectiveSurface => {
                match (self.kind.as_directive(), previous.kind.as_directive()) {
                    (Some(current), Some(prior)) => current.is_public_api_affected(prior),
                    _ => true,
                }
            }
            CrossKindPolicy::SameKind => match (&self.kind, &previous.kind) {
                (SymbolKind::Directive(current), SymbolKind::Directive(prior)) => {
                    current.is_public_api_affected(prior)
                }
                (SymbolKind::Component(current), SymbolKind::Component(prior)) => {
                    current.is_public_api_affected(prior)
                }
                (SymbolKind::Pipe(current), SymbolKind::Pipe(prior)) => {
                    current.is_public_api_affected(prior)
                }
                (SymbolKind::NgModule(current), SymbolKind::NgModule(prior)) => {
                    current.is_public_api_affected(prior, ctx)
                }
                (SymbolKind::Opaque(current), SymbolKind::Opaque(prior)) => {
                    current.is_public_api_affected(prior, ctx.is_unit_changed(&self.path))
                }
                _ => true,
            },
        }
    }

    /// Whether this symbol's own emit must be regenerated because of what it
    /// uses. Only consulted for symbols that are not already affected.
    pub fn is_emit_affected(&self, previous: &SemanticSymbol, ctx: &EmitContext<'_>) -> bool {
        match (&self.kind, &previous.kind) {
            (SymbolKind::Component(current), SymbolKind::Component(prior)) => {
                current.is_emit_affected(prior, ctx)
            }
            // A module's definition names its members but does not depend on
            // their public API; its own surface changes are caught by the diff.
            (SymbolKind::NgModule(_), _) => false,
            // Nothing is emitted for opaque declarations.
            (SymbolKind::Opaque(_), _) => false,
            _ => ctx.uses_public_api_affected(),
        }
    }

    /// Whether consumers' type-check blocks may observe a difference.
    pub fn is_type_check_api_affected(&self, previous: &SemanticSymbol, ctx: &DiffContext<'_>) -> bool {
        match (self.kind.as_directive(), previous.kind.as_directive()) {
            (Some(current), Some(prior)) => current.is_type_check_api_affected(prior),
            _ => self.is_public_api_affected(previous, ctx),
        }
    }
}

bitflags! {
    /// Why a symbol ended up in an affected set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AffectedReason: u16 {
        /// Not present in the previous generation.
        const NEW_SYMBOL = 1 << 0;
        /// No stable identifier; cannot be tracked.
        const NO_IDENTITY = 1 << 1;
        /// Its own public API changed.
        const PUBLIC_API = 1 << 2;
        /// A module whose exported surface contains a public-API-affected symbol.
        const EXPORTED_DEPENDENCY = 1 << 3;
        /// It uses a public-API-affected symbol.
        const DEPENDENCY = 1 << 4;
        /// Its set of outgoing edges differs between generations.
        const EDGES_CHANGED = 1 << 5;
        /// Its participation in a remote-scope cycle changed.
        const REMOTE_SCOPE = 1 << 6;
        /// No usable previous generation.
        const FULL_REBUILD = 1 << 7;
    }
}

/// A set of symbols of one generation, with the reasons they were added.
#[derive(Debug, Clone)]
pub struct AffectedSet {
    reasons: Vec<AffectedReason>,
    len: usize,
}

impl AffectedSet {
    pub fn new(symbol_count: usize) -> Self {
        Self {
            reasons: vec![AffectedReason::empty(); symbol_count],
            len: 0,
        }
    }

    /// Marks `id`; returns whether it was not marked before.
    pub fn mark(&mut self, id: SymbolId, reason: AffectedReason) -> bool {
        let slot = &mut self.reasons[id.0];
        let newly = slot.is_empty();
        *slot |= reason;
        if newly {
            self.len += 1;
        }
        newly
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.reasons.get(id.0).is_some_and(|r| !r.is_empty())
    }

    pub fn reason(&self, id: SymbolId) -> AffectedReason {
        self.reasons.get(id.0).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.reasons
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_empty())
            .map(|(i, _)| SymbolId(i))
    }

    pub fn to_keys(&self, graph: &SemanticDepGraph) -> BTreeSet<SymbolKey> {
        self.ids().map(|id| graph.symbol(id).key()).collect()
    }
}

/// Everything a public-API comparison may need besides the two symbols.
pub struct DiffContext<'a> {
    pub current: &'a SemanticDepGraph,
    pub previous: &'a SemanticDepGraph,
    pub changed_units: &'a BTreeSet<AbsoluteFsPath>,
}

impl<'a> DiffContext<'a> {
    pub fn new(
        current: &'a SemanticDepGraph,
        previous: &'a SemanticDepGraph,
        changed_units: &'a BTreeSet<AbsoluteFsPath>,
    ) -> Self {
        Self {
            current,
            previous,
            changed_units,
        }
    }

    pub fn is_unit_changed(&self, path: &AbsoluteFsPath) -> bool {
        self.changed_units.contains(path)
    }

    /// Whether two lists of references, resolved in their own generations,
    /// denote the same set of identities. Unidentifiable members never compare
    /// equal.
    pub fn is_reference_set_equal(&self, current: &[SymbolKey], previous: &[SymbolKey]) -> bool {
        match (
            self.current.identities_of(current),
            self.previous.identities_of(previous),
        ) {
            (Some(current), Some(previous)) => current == previous,
            _ => false,
        }
    }
}

/// Context for the emit predicate of one symbol in one propagation round.
pub struct EmitContext<'a> {
    pub current: &'a SemanticDepGraph,
    pub current_id: SymbolId,
    pub public_api_affected: &'a AffectedSet,
}

impl<'a> EmitContext<'a> {
    /// Default predicate: any symbol this one uses has an affected public API.
    pub fn uses_public_api_affected(&self) -> bool {
        self.uses_public_api_affected_via(&[EdgeKind::DirectReference, EdgeKind::TemplateMatch])
    }

    pub fn uses_public_api_affected_via(&self, kinds: &[EdgeKind]) -> bool {
        self.current
            .edges(self.current_id)
            .iter()
            .filter(|edge| kinds.contains(&edge.kind))
            .filter_map(|edge| self.current.id_of(&edge.target))
            .any(|target| self.public_api_affected.contains(target))
    }
}
