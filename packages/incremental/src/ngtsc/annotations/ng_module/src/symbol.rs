// NgModule Symbol
//
// Symbol representation for NgModule semantic graph tracking.

use serde::{Deserialize, Serialize};

use crate::ngtsc::incremental::semantic_graph::src::api::{DiffContext, SymbolKey};
use crate::ngtsc::reflection::NgModuleMeta;

/// NgModule symbol for incremental compilation tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgModuleSymbol {
    /// Declared directives, components and pipes.
    pub declarations: Vec<SymbolKey>,
    /// Exported surface, flattened through re-exported modules.
    pub exports: Vec<SymbolKey>,
    /// Transitive import closure.
    pub transitive_imports: Vec<SymbolKey>,
    /// Whether this module has providers.
    pub has_providers: bool,
}

impl NgModuleSymbol {
    pub fn new(has_providers: bool) -> Self {
        Self {
            declarations: Vec::new(),
            exports: Vec::new(),
            transitive_imports: Vec::new(),
            has_providers,
        }
    }

    pub fn from_meta(meta: &NgModuleMeta) -> Self {
        Self {
            declarations: meta.declarations.clone(),
            exports: meta.exports.clone(),
            transitive_imports: meta.transitive_imports.clone(),
            has_providers: meta.has_providers,
        }
    }

    /// Every symbol the module definition names.
    pub fn referenced(&self) -> impl Iterator<Item = &SymbolKey> {
        self.declarations
            .iter()
            .chain(self.exports.iter())
            .chain(self.transitive_imports.iter())
    }

    /// Check if public API is affected by changes.
    ///
    /// Declarations and exports are compared as separate identity sets:
    /// starting to export an already declared symbol changes what importers
    /// see, even though the union is unchanged.
    pub fn is_public_api_affected(&self, previous: &NgModuleSymbol, ctx: &DiffContext<'_>) -> bool {
        if self.has_providers != previous.has_providers {
            return true;
        }

        !ctx.is_reference_set_equal(&self.declarations, &previous.declarations)
            || !ctx.is_reference_set_equal(&self.exports, &previous.exports)
            || !ctx.is_reference_set_equal(&self.transitive_imports, &previous.transitive_imports)
    }
}
