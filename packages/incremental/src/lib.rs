#![deny(clippy::all)]

/**
 * Angular Incremental - Rust Implementation
 *
 * Semantic dependency graph and change propagation for incremental rebuilds
 */
pub mod config;
pub mod ngtsc;

pub use config::IncrementalOptions;
pub use ngtsc::incremental::semantic_graph::{
    build_graph, compute_changed_symbols, compute_emit_affected, SemanticDepGraph, SymbolKey,
};
pub use ngtsc::incremental::{
    diff_and_propagate, IncrementalCompilation, IncrementalError, IncrementalState,
    InvalidationResult, ReemitPlan,
};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
