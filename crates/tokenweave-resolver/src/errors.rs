//! Resolution errors.

use thiserror::Error;

/// Errors raised while following alias edges.
///
/// None of these abort a generation: the orchestrator turns them into
/// warnings and drops the affected token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Circular alias: {}", .cycle.join(" -> "))]
    CircularAlias { cycle: Vec<String> },

    #[error("Alias target '{target}' of '{path}' does not exist")]
    MissingTarget { path: String, target: String },

    #[error("Unknown token: {path}")]
    UnknownToken { path: String },

    #[error("Token '{path}' has no value")]
    NoValue { path: String },
}

impl ResolveError {
    /// The token path the error is about.
    pub fn path(&self) -> &str {
        match self {
            Self::CircularAlias { cycle } => cycle.first().map(String::as_str).unwrap_or(""),
            Self::MissingTarget { path, .. } | Self::UnknownToken { path } | Self::NoValue { path } => path,
        }
    }
}
