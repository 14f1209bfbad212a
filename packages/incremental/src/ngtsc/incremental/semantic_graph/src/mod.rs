// Semantic Graph Source Module

pub mod api;
pub mod diff;
pub mod graph;
pub mod propagation;
pub mod util;

// Re-exports
pub use api::{
    AffectedReason, AffectedSet, CrossKindPolicy, EdgeKind, OpaqueSymbol, SemanticSymbol,
    SymbolEdge, SymbolId, SymbolIdentity, SymbolKey, SymbolKind,
};
pub use diff::compute_changed_symbols;
pub use graph::{build_graph, build_graph_with, EdgeList, SemanticDepGraph};
pub use propagation::{compute_emit_affected, compute_type_check_affected, EmitAffected, PropagationStats};
pub use util::resolve_identifier;
