//! Error types for mishap-content

use thiserror::Error;

/// Content loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// A single definition failed validation
    #[error("Malformed {kind} definition '{id}': {reason}")]
    MalformedDefinition {
        kind: &'static str,
        id: String,
        reason: String,
    },

    /// The finished library cannot support issuance or resolution
    #[error("Content library unusable: {0}")]
    Unusable(String),
}

impl Error {
    /// True for errors that reject one definition rather than the whole load
    pub fn is_malformed_definition(&self) -> bool {
        matches!(self, Error::MalformedDefinition { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
