//! File System Abstraction
//!
//! Path identity for symbols. The engine never reads from disk itself; it
//! only needs stable, comparable absolute paths.

pub mod src;


pub use src::*;
