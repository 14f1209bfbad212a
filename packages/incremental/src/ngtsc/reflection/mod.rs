//! Reflection
//!
//! The declaration model handed over by the front-end. Parsing and decorator
//! evaluation happen elsewhere; by the time a `SourceUnit` reaches this crate
//! every declaration's metadata and outgoing references are resolved.

pub mod src;


pub use src::host::{
    ClassDeclaration, ComponentMeta, DeclarationExport, DeclarationMetadata, DeclarationNesting,
    DeclarationReference, DirectiveMeta, NgModuleMeta, OpaqueMeta, PipeMeta, SourceUnit,
};
