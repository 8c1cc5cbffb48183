//! In-memory ledger store

use crate::error::{Error, Result};
use crate::store::{LedgerIndex, LedgerStore, TimeRange};
use mishap_core::{ActionRecord, CharacterId, LedgerEntry, LedgerId};
use std::sync::RwLock;
use tracing::debug;

/// Ledger kept entirely in memory
///
/// Appends take the write lock for the whole assign-and-push step, so two
/// appends can never receive the same sequence number.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    index: RwLock<LedgerIndex>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed entries
    pub fn len(&self) -> usize {
        self.index.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for MemoryLedger {
    fn append(&self, record: ActionRecord) -> Result<LedgerId> {
        let mut index = self.index.write().map_err(|_| Error::LockPoisoned)?;
        let id = index.next_id(record.character);
        index.push(LedgerEntry::new(id, record));
        debug!(%id, "appended ledger entry");
        Ok(id)
    }

    fn get(&self, id: LedgerId) -> Result<Option<LedgerEntry>> {
        let index = self.index.read().map_err(|_| Error::LockPoisoned)?;
        Ok(index.get(id).cloned())
    }

    fn query(&self, character: CharacterId, range: &TimeRange) -> Result<Vec<LedgerEntry>> {
        let index = self.index.read().map_err(|_| Error::LockPoisoned)?;
        Ok(index.query(character, range))
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let index = self.index.read().map_err(|_| Error::LockPoisoned)?;
        Ok(index.all())
    }

    fn name(&self) -> &str {
        "memory"
    }

    fn latest_for(&self, character: CharacterId) -> Result<Option<LedgerEntry>> {
        let index = self.index.read().map_err(|_| Error::LockPoisoned)?;
        Ok(index.latest(character).cloned())
    }

    fn find_by_seed(&self, character: CharacterId, derived_seed: u64) -> Result<Option<LedgerEntry>> {
        let index = self.index.read().map_err(|_| Error::LockPoisoned)?;
        Ok(index.find_by_seed(character, derived_seed).cloned())
    }
}
