// Annotations Pipe Source Module

pub mod symbol;

// Re-exports
pub use symbol::PipeSymbol;
