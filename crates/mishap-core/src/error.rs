//! Error types for mishap-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown axis: {0}")]
    UnknownAxis(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Unknown trigger condition: {0}")]
    UnknownTrigger(String),

    #[error("Invalid sex: {0}")]
    InvalidSex(String),

    #[error("Attribute {attribute} out of range: {value} (expected 1..=10)")]
    AttributeOutOfRange { attribute: String, value: i32 },

    #[error("Invalid character: {0}")]
    InvalidCharacter(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
