//! Testing
//!
//! In-memory programs and declaration builders for exercising the engine
//! with synthetic generations.

pub mod src;

pub use src::*;
