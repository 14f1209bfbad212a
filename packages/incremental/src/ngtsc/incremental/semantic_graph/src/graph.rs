// Semantic Graph
//
// The semantic dependency graph of one build generation, and its
// construction from the declarations reported by the front-end.

use indexmap::IndexMap;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

use super::api::{
    EdgeKind, OpaqueSymbol, SemanticSymbol, SymbolEdge, SymbolId, SymbolIdentity, SymbolKey,
    SymbolKind,
};
use super::util::resolve_identifier;
use crate::ngtsc::annotations::component::src::symbol::ComponentSymbol;
use crate::ngtsc::annotations::directive::src::symbol::DirectiveSymbol;
use crate::ngtsc::annotations::ng_module::src::symbol::NgModuleSymbol;
use crate::ngtsc::annotations::pipe::src::symbol::PipeSymbol;
use crate::ngtsc::file_system::AbsoluteFsPath;
use crate::ngtsc::incremental::src::error::{IncrementalError, Result};
use crate::ngtsc::reflection::{ClassDeclaration, DeclarationMetadata, SourceUnit};

pub type EdgeList = SmallVec<[SymbolEdge; 4]>;

/// Semantic dependency graph of a single generation.
///
/// Nodes live in a vector; edges are adjacency lists by node index whose
/// targets are stored as keys. Nothing in here points into another
/// generation, so two graphs can be compared and dropped independently.
#[derive(Debug, Clone, Default)]
pub struct SemanticDepGraph {
    symbols: Vec<SemanticSymbol>,
    edges: Vec<EdgeList>,
    index: IndexMap<SymbolKey, SymbolId>,
    identities: HashMap<SymbolIdentity, SymbolId>,
    files: BTreeSet<AbsoluteFsPath>,
}

impl SemanticDepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a graph from symbols and their outgoing edges.
    ///
    /// Entries are sorted by `(path, name)` first, so the result does not
    /// depend on the order in which they were produced.
    pub(crate) fn from_parts(
        mut entries: Vec<(SemanticSymbol, EdgeList)>,
        files: impl IntoIterator<Item = AbsoluteFsPath>,
    ) -> Result<Self> {
        entries.sort_by(|(a, _), (b, _)| (&a.path, &a.name).cmp(&(&b.path, &b.name)));

        let mut graph = SemanticDepGraph {
            symbols: Vec::with_capacity(entries.len()),
            edges: Vec::with_capacity(entries.len()),
            index: IndexMap::with_capacity(entries.len()),
            identities: HashMap::new(),
            files: files.into_iter().collect(),
        };

        for (symbol, edges) in entries {
            let id = SymbolId(graph.symbols.len());
            let key = symbol.key();
            if graph.index.insert(key.clone(), id).is_some() {
                return Err(IncrementalError::DuplicateSymbol(key));
            }
            if let Some(identity) = symbol.identity() {
                graph.identities.insert(identity, id);
            }
            graph.files.insert(symbol.path.clone());
            graph.symbols.push(symbol);
            graph.edges.push(edges);
        }

        graph.validate()?;
        Ok(graph)
    }

    /// Every edge must point at a symbol of this same generation.
    fn validate(&self) -> Result<()> {
        for (id, edges) in self.edges.iter().enumerate() {
            for edge in edges {
                if !self.index.contains_key(&edge.target) {
                    return Err(IncrementalError::InconsistentGraph {
                        from: self.symbols[id].key(),
                        target: edge.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, id: SymbolId) -> &SemanticSymbol {
        &self.symbols[id.0]
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &SemanticSymbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, symbol)| (SymbolId(i), symbol))
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.symbols.len()).map(SymbolId)
    }

    pub fn edges(&self, id: SymbolId) -> &[SymbolEdge] {
        &self.edges[id.0]
    }

    pub fn id_of(&self, key: &SymbolKey) -> Option<SymbolId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&SemanticSymbol> {
        self.id_of(key).map(|id| self.symbol(id))
    }

    pub fn id_by_identity(&self, identity: &SymbolIdentity) -> Option<SymbolId> {
        self.identities.get(identity).copied()
    }

    /// The symbol of this generation with the same identity as `symbol`,
    /// which usually belongs to another generation.
    pub fn equivalent_of(&self, symbol: &SemanticSymbol) -> Option<SymbolId> {
        symbol
            .identity()
            .and_then(|identity| self.id_by_identity(&identity))
    }

    /// The identity of the symbol stored under `key`, if it has one.
    pub fn identity_of(&self, key: &SymbolKey) -> Option<SymbolIdentity> {
        self.get(key).and_then(SemanticSymbol::identity)
    }

    /// Resolves a list of keys into their identities. `None` when any of them
    /// is unknown or unidentifiable, since such a set cannot be compared
    /// across generations.
    pub fn identities_of(&self, keys: &[SymbolKey]) -> Option<BTreeSet<SymbolIdentity>> {
        keys.iter().map(|key| self.identity_of(key)).collect()
    }

    /// Outgoing edges of `id` as `(kind, target identity)` pairs, or `None`
    /// when a target has no identity.
    pub fn edge_identities(
        &self,
        id: SymbolId,
        filter: impl Fn(EdgeKind) -> bool,
    ) -> Option<BTreeSet<(EdgeKind, SymbolIdentity)>> {
        self.edges(id)
            .iter()
            .filter(|edge| filter(edge.kind))
            .map(|edge| self.identity_of(&edge.target).map(|identity| (edge.kind, identity)))
            .collect()
    }

    /// All source units of this generation, including those without
    /// declarations.
    pub fn files(&self) -> &BTreeSet<AbsoluteFsPath> {
        &self.files
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&SemanticSymbol, &EdgeList)> {
        self.symbols.iter().zip(self.edges.iter())
    }
}

/// Builds the graph of one generation from the front-end's source units.
pub fn build_graph(units: &[SourceUnit]) -> Result<SemanticDepGraph> {
    build_graph_with(units, true)
}

/// Like [`build_graph`], optionally constructing symbols on the rayon pool.
#[instrument(skip_all, fields(units = units.len(), parallel))]
pub fn build_graph_with(units: &[SourceUnit], parallel: bool) -> Result<SemanticDepGraph> {
    let entries: Vec<(SemanticSymbol, EdgeList)> = if parallel {
        units
            .par_iter()
            .flat_map_iter(|unit| unit.declarations.iter().map(move |decl| symbol_for(unit, decl)))
            .collect()
    } else {
        units
            .iter()
            .flat_map(|unit| unit.declarations.iter().map(move |decl| symbol_for(unit, decl)))
            .collect()
    };

    let graph = SemanticDepGraph::from_parts(entries, units.iter().map(|u| u.path.clone()))?;
    debug!(symbols = graph.len(), files = graph.files().len(), "built semantic graph");
    Ok(graph)
}

fn symbol_for(unit: &SourceUnit, decl: &ClassDeclaration) -> (SemanticSymbol, EdgeList) {
    let mut edges: EdgeList = decl
        .references
        .iter()
        .map(|reference| SymbolEdge {
            target: reference.target.clone(),
            kind: reference.kind,
        })
        .collect();

    let kind = match &decl.metadata {
        DeclarationMetadata::Directive(meta) => SymbolKind::Directive(DirectiveSymbol::from_meta(meta)),
        DeclarationMetadata::Component(meta) => SymbolKind::Component(ComponentSymbol::from_meta(meta)),
        DeclarationMetadata::Pipe(meta) => SymbolKind::Pipe(PipeSymbol::from_meta(meta)),
        DeclarationMetadata::NgModule(meta) => SymbolKind::NgModule(NgModuleSymbol::from_meta(meta)),
        DeclarationMetadata::Opaque(meta) => SymbolKind::Opaque(OpaqueSymbol {
            fingerprint: meta.fingerprint.clone(),
        }),
    };

    // Module metadata and base classes are references too, whether or not
    // the front-end also reported them as edges.
    match &kind {
        SymbolKind::NgModule(module) => {
            edges.extend(module.referenced().map(|target| SymbolEdge {
                target: target.clone(),
                kind: EdgeKind::DirectReference,
            }));
        }
        _ => {
            if let Some(base) = kind.as_directive().and_then(|dir| dir.base_class.as_ref()) {
                edges.push(SymbolEdge {
                    target: base.clone(),
                    kind: EdgeKind::DirectReference,
                });
            }
        }
    }
    edges.sort();
    edges.dedup();

    let symbol = SemanticSymbol {
        path: unit.path.clone(),
        name: decl.name.clone(),
        identifier: resolve_identifier(decl),
        kind,
    };
    (symbol, edges)
}
