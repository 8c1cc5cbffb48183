//! Error types for mishap-ledger

use thiserror::Error;

/// Ledger error type
#[derive(Debug, Error)]
pub enum Error {
    /// The entry could not be made durable; no id was issued
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A stored entry could not be read back
    #[error("Corrupt ledger at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),

    /// A writer panicked while holding the ledger lock
    #[error("Ledger lock poisoned")]
    LockPoisoned,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;
