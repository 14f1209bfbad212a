//! Cycles
//!
//! Reference-cycle detection over the semantic graph, and the remote-scope
//! fixups that cycles between modules and their components require.

pub mod src;


pub use src::analyzer::CycleAnalyzer;
pub use src::remote_scope::{resolve_remote_scope_fixups, RemoteScopeAnalysis};
