// Component Symbol
//
// Symbol representation for component semantic graph tracking.

use serde::{Deserialize, Serialize};

use crate::ngtsc::annotations::directive::src::symbol::DirectiveSymbol;
use crate::ngtsc::incremental::semantic_graph::src::api::{
    AffectedSet, EdgeKind, EmitContext, SymbolId,
};
use crate::ngtsc::incremental::semantic_graph::src::graph::SemanticDepGraph;
use crate::ngtsc::reflection::ComponentMeta;

/// Component symbol for incremental compilation tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSymbol {
    /// Base directive symbol.
    pub directive: DirectiveSymbol,
    /// Whether this component is standalone (imports its own dependencies).
    pub is_standalone: bool,
}

impl ComponentSymbol {
    pub fn new(selector: Option<String>) -> Self {
        Self::with_directive(DirectiveSymbol::new(selector))
    }

    pub fn with_directive(directive: DirectiveSymbol) -> Self {
        Self {
            directive,
            is_standalone: false,
        }
    }

    pub fn from_meta(meta: &ComponentMeta) -> Self {
        Self {
            directive: DirectiveSymbol::from_meta(&meta.directive),
            is_standalone: meta.is_standalone,
        }
    }

    /// Components are used through their directive surface.
    pub fn is_public_api_affected(&self, previous: &ComponentSymbol) -> bool {
        self.directive.is_public_api_affected(&previous.directive)
    }

    /// Check if emit is affected by changes.
    ///
    /// The template function references the matched directives and pipes, so
    /// any change to the public API of something the template matched (or the
    /// component imports) invalidates the emitted definition.
    pub fn is_emit_affected(&self, previous: &ComponentSymbol, ctx: &EmitContext<'_>) -> bool {
        if self.is_standalone != previous.is_standalone {
            return true;
        }

        ctx.uses_public_api_affected()
    }

    /// Check if the type check block is affected.
    ///
    /// `type_check_api_affected` holds the symbols of the current generation
    /// whose type-check API changed.
    pub fn is_type_check_block_affected(
        &self,
        graph: &SemanticDepGraph,
        id: SymbolId,
        type_check_api_affected: &AffectedSet,
    ) -> bool {
        graph
            .edges(id)
            .iter()
            .filter(|edge| edge.kind == EdgeKind::TemplateMatch)
            .filter_map(|edge| graph.id_of(&edge.target))
            .any(|target| type_check_api_affected.contains(target))
    }
}
