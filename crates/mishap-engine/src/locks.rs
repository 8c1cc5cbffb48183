//! Per-character ordering locks

use crate::error::{Error, Result};
use mishap_core::CharacterId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One mutex per character
///
/// Holding a character's lock across compute and append keeps that
/// character's ledger in action order while other characters proceed.
#[derive(Debug, Default)]
pub struct CharacterLocks {
    locks: Mutex<HashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock for a character, created on first use
    pub fn for_character(&self, id: CharacterId) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| Error::LockPoisoned("character lock table"))?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    /// Number of characters that have a lock
    pub fn len(&self) -> Result<usize> {
        Ok(self
            .locks
            .lock()
            .map_err(|_| Error::LockPoisoned("character lock table"))?
            .len())
    }
}
