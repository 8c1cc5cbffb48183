//! Error types for mishap-engine
//!
//! Every error maps to a stable [`ErrorKind`] code that callers outside the
//! process can match on; `Display` carries the human-readable detail.

use mishap_core::{CharacterId, DefId, ItemId, LedgerId, RoomId};
use std::fmt;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid sex: {0}")]
    InvalidSex(String),

    #[error("unknown action type '{0}'")]
    InvalidActionType(DefId),

    #[error("character {0} not found")]
    CharacterNotFound(CharacterId),

    #[error("character {0} is inactive")]
    CharacterInactive(CharacterId),

    #[error("room '{0}' not found")]
    RoomNotFound(RoomId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("unknown item quirk '{0}'")]
    UnknownItemQuirk(DefId),

    #[error("ledger entry {0} not found")]
    EntryNotFound(LedgerId),

    /// Loading or validating content failed
    #[error("content error: {0}")]
    Content(#[from] mishap_content::Error),

    /// The library cannot satisfy a request it was validated for
    #[error("content library error: {0}")]
    ContentLibrary(String),

    /// A record assembled by the engine broke a model invariant
    #[error("core error: {0}")]
    Core(#[from] mishap_core::Error),

    /// Appending to the ledger failed; no entry was written
    #[error("ledger commit failed: {0}")]
    LedgerCommit(mishap_ledger::Error),

    /// Reading from the ledger failed
    #[error("ledger error: {0}")]
    Ledger(#[from] mishap_ledger::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A thread panicked while holding an engine lock
    #[error("engine lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

impl Error {
    /// Stable machine-readable classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidSex(_) => ErrorKind::InvalidSex,
            Error::Core(mishap_core::Error::InvalidSex(_)) => ErrorKind::InvalidSex,
            Error::InvalidActionType(_) => ErrorKind::InvalidActionType,
            Error::CharacterNotFound(_) => ErrorKind::CharacterNotFound,
            Error::CharacterInactive(_) => ErrorKind::CharacterInactive,
            Error::RoomNotFound(_) => ErrorKind::RoomNotFound,
            Error::ItemNotFound(_) => ErrorKind::ItemNotFound,
            Error::UnknownItemQuirk(_) => ErrorKind::UnknownItemQuirk,
            Error::EntryNotFound(_) => ErrorKind::EntryNotFound,
            Error::Content(e) if e.is_malformed_definition() => ErrorKind::MalformedQuirkDefinition,
            Error::Content(_) => ErrorKind::ContentLibraryLoad,
            Error::ContentLibrary(_) | Error::Core(_) => ErrorKind::ContentLibrary,
            Error::LedgerCommit(_) => ErrorKind::LedgerCommitFailed,
            Error::Ledger(_) => ErrorKind::Ledger,
            Error::Config(_) => ErrorKind::Config,
            Error::LockPoisoned(_) => ErrorKind::Internal,
        }
    }
}

/// Error codes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSex,
    InvalidActionType,
    CharacterNotFound,
    CharacterInactive,
    RoomNotFound,
    ItemNotFound,
    UnknownItemQuirk,
    EntryNotFound,
    ContentLibraryLoad,
    MalformedQuirkDefinition,
    ContentLibrary,
    LedgerCommitFailed,
    Ledger,
    Config,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSex => "INVALID_SEX",
            ErrorKind::InvalidActionType => "INVALID_ACTION_TYPE",
            ErrorKind::CharacterNotFound => "CHARACTER_NOT_FOUND",
            ErrorKind::CharacterInactive => "CHARACTER_INACTIVE",
            ErrorKind::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorKind::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorKind::UnknownItemQuirk => "UNKNOWN_ITEM_QUIRK",
            ErrorKind::EntryNotFound => "LEDGER_ENTRY_NOT_FOUND",
            ErrorKind::ContentLibraryLoad => "CONTENT_LIBRARY_LOAD_ERROR",
            ErrorKind::MalformedQuirkDefinition => "MALFORMED_QUIRK_DEFINITION",
            ErrorKind::ContentLibrary => "CONTENT_LIBRARY_ERROR",
            ErrorKind::LedgerCommitFailed => "LEDGER_COMMIT_FAILED",
            ErrorKind::Ledger => "LEDGER_ERROR",
            ErrorKind::Config => "CONFIG_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
