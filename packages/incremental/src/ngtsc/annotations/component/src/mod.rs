// Annotations Component Source Module

pub mod symbol;

// Re-exports
pub use symbol::ComponentSymbol;
