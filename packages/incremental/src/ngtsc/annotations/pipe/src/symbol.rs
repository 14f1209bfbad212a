// Pipe Symbol
//
// Represents an Angular pipe for semantic graph tracking.

use serde::{Deserialize, Serialize};

use crate::ngtsc::reflection::PipeMeta;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeSymbol {
    /// The name templates use to invoke the pipe.
    pub name: String,
}

impl PipeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn from_meta(meta: &PipeMeta) -> Self {
        Self::new(meta.pipe_name.clone())
    }

    pub fn is_public_api_affected(&self, previous: &PipeSymbol) -> bool {
        self.name != previous.name
    }
}
