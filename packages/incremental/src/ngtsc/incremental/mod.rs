//! Incremental Compilation
//!
//! Semantic dependency tracking between build generations. The semantic
//! graph records what every declaration exposes and uses; comparing two
//! generations yields the minimal set of units to re-emit.

pub mod semantic_graph;
pub mod src;

#[cfg(test)]
mod test;

pub use src::*;
