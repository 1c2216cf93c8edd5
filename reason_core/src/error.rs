//! Error types for the reasoning core.

use thiserror::Error;

/// Errors raised by the reasoning core.
#[derive(Debug, Error)]
pub enum ReasonError {
    /// A knowledge root could not be created or scanned.
    #[error("knowledge path error: {0}")]
    Io(#[from] std::io::Error),

    /// A knowledge document failed to decode.
    #[error("malformed knowledge document: {0}")]
    Document(#[from] serde_json::Error),

    /// A rule specification failed to compile.
    #[error(transparent)]
    Rule(#[from] dialog_rules::RuleError),

    /// The single-answer entry point produced no argument.
    #[error("no reaction produced for query `{query}`")]
    NoReaction { query: String },
}
