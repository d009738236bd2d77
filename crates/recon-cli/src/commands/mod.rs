//! CLI command implementations.

pub mod headers;
pub mod reconcile;
pub mod suggest;
