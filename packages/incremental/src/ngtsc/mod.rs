//! Angular TypeScript Compiler (ngtsc)
//!
//! The parts of the compiler that decide, after a change, which previously
//! emitted output can be reused.

pub mod annotations;
pub mod file_system;
pub mod reflection;

pub mod cycles;
pub mod incremental;

pub mod testing;
