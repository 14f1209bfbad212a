// Incremental Source Module

pub mod api;
pub mod error;
pub mod incremental;
pub mod state;

// Re-exports
pub use api::{EmitArtifactPair, InvalidationResult, ReemitPlan};
pub use error::{IncrementalError, Result};
pub use incremental::{diff_and_propagate, IncrementalCompilation, PendingPass};
pub use state::{GraphSnapshot, IncrementalState, SNAPSHOT_VERSION};
