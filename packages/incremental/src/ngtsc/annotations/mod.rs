//! Annotations
//!
//! Per-decorator semantic symbols: the public-API snapshot each kind of
//! declaration contributes to the semantic dependency graph.

pub mod component;
pub mod directive;
pub mod ng_module;
pub mod pipe;
