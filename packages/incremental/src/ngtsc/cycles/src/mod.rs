pub mod analyzer;
pub mod remote_scope;
