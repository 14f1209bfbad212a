// Testing Source Module

pub mod fixtures;
pub mod program;

// Re-exports
pub use fixtures::*;
pub use program::TestProgram;
