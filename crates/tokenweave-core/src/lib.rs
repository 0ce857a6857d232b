//! Core types and utilities for tokenweave.
//!
//! This crate provides the foundational types used across all other tokenweave crates:
//! - The token document model (DTCG-flavored JSON parsed into typed tokens)
//! - Tree walking over token documents
//! - Value types (colors, dimensions, typography, shadows, borders)
//! - Naming helpers shared by every emitter
//! - Target platform and source format enums
//! - Error types

pub mod document;
pub mod errors;
pub mod format;
pub mod naming;
pub mod types;
pub mod walker;

pub use document::*;
pub use errors::*;
pub use format::*;
pub use naming::*;
pub use types::*;
pub use walker::*;
