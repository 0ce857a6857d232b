//! Alias resolution for token documents.
//!
//! This crate provides:
//! - The token graph (nodes keyed by canonical path plus an alias edge map)
//! - Cycle detection and fail-closed alias resolution
//! - The dependency map used for "what uses this" impact queries

mod dependencies;
mod errors;
mod graph;

pub use dependencies::{unused_primitives, DependencyMap, ImpactReport, ImpactedToken};
pub use errors::ResolveError;
pub use graph::{Resolution, ResolvedToken, TokenGraph, TokenGraphNode};
