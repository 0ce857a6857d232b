//! Error types for token documents.

use thiserror::Error;

/// Errors raised while loading a token document.
///
/// Any of these fails the whole generation request: a malformed document
/// never produces partial output.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid JSON in document '{name}': {source}")]
    InvalidJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Document '{name}' must be a JSON object at the root")]
    NotAnObject { name: String },

    #[error("Malformed token at '{path}' in document '{document}': {reason}")]
    MalformedToken {
        document: String,
        path: String,
        reason: String,
    },
}
