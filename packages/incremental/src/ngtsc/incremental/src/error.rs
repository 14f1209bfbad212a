// Incremental Errors

use std::path::PathBuf;
use thiserror::Error;

use crate::ngtsc::incremental::semantic_graph::src::api::SymbolKey;

#[derive(Debug, Error)]
pub enum IncrementalError {
    /// An edge or module reference points at a symbol that is not part of
    /// the same generation.
    #[error("inconsistent semantic graph: {from} references {target}, which is not part of this build")]
    InconsistentGraph { from: SymbolKey, target: SymbolKey },

    #[error("declaration {0} was reported more than once")]
    DuplicateSymbol(SymbolKey),

    #[error("unsupported graph snapshot version {found} (expected {expected})")]
    SnapshotVersion { found: u32, expected: u32 },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed graph snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IncrementalError>;
