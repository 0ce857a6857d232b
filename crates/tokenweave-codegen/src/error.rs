//! Error types for code generation.

use thiserror::Error;
use tokenweave_core::DocumentError;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that abort a generation request.
///
/// Everything recoverable (alias cycles, missing targets, reference-file
/// bugs) is reported as a [`Warning`](crate::Warning) instead.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Malformed input document.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// A reference file whose format cannot be inferred.
    #[error("Cannot infer the source format of reference file '{0}'")]
    UnknownReferenceFormat(String),
}
