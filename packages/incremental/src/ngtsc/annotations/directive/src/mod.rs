// Annotations Directive Source Module

pub mod symbol;

// Re-exports
pub use symbol::{
    DirectiveSymbol, DirectiveTypeCheckMeta, InputMappingMeta, InputOrOutput,
    SemanticTypeParameter, TemplateGuardMeta, TemplateGuardType,
};
