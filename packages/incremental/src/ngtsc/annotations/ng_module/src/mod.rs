// Annotations NgModule Source Module

pub mod symbol;

// Re-exports
pub use symbol::NgModuleSymbol;
