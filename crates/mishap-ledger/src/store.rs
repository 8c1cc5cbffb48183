//! The ledger store contract and the index shared by its implementations

use crate::error::Result;
use chrono::{DateTime, Utc};
use mishap_core::{ActionRecord, CharacterId, LedgerEntry, LedgerId};
use std::collections::{BTreeMap, HashMap};

/// Inclusive time window; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Everything ever recorded
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at <= e)
    }
}

/// Trait for ledger storage backends
///
/// Implementations must be append-only: `append` either makes the record
/// durable and returns its new id, or fails without leaving anything
/// visible. There is no update and no delete.
pub trait LedgerStore: Send + Sync {
    /// Commit a record, assigning the next sequence for its character
    fn append(&self, record: ActionRecord) -> Result<LedgerId>;

    /// Fetch a committed entry
    fn get(&self, id: LedgerId) -> Result<Option<LedgerEntry>>;

    /// A character's entries within a time window, in sequence order
    fn query(&self, character: CharacterId, range: &TimeRange) -> Result<Vec<LedgerEntry>>;

    /// Every entry, ordered by character then sequence
    fn entries(&self) -> Result<Vec<LedgerEntry>>;

    /// Get the store name (for logging)
    fn name(&self) -> &str;

    /// The character's most recent entry
    ///
    /// The default scans the whole history; indexed stores override it.
    fn latest_for(&self, character: CharacterId) -> Result<Option<LedgerEntry>> {
        Ok(self.query(character, &TimeRange::all())?.pop())
    }

    /// The character's most recent entry resolved from the given derived seed
    fn find_by_seed(&self, character: CharacterId, derived_seed: u64) -> Result<Option<LedgerEntry>> {
        Ok(self
            .query(character, &TimeRange::all())?
            .into_iter()
            .rev()
            .find(|e| e.record.derived_seed == derived_seed))
    }
}

/// Per-character append-only vectors
///
/// Sequence numbers are positions + 1, so they are dense and monotonic.
/// Derived seeds map to the latest entry that used them.
#[derive(Debug, Default)]
pub(crate) struct LedgerIndex {
    by_character: BTreeMap<CharacterId, Vec<LedgerEntry>>,
    by_seed: HashMap<(CharacterId, u64), LedgerId>,
}

impl LedgerIndex {
    /// Id the next record for this character will receive
    pub fn next_id(&self, character: CharacterId) -> LedgerId {
        let seq = self.by_character.get(&character).map_or(0, |v| v.len() as u64) + 1;
        LedgerId::new(character, seq)
    }

    /// Push an entry whose id was produced by `next_id`
    pub fn push(&mut self, entry: LedgerEntry) {
        self.by_seed
            .insert((entry.id.character, entry.record.derived_seed), entry.id);
        self.by_character
            .entry(entry.id.character)
            .or_default()
            .push(entry);
    }

    pub fn get(&self, id: LedgerId) -> Option<&LedgerEntry> {
        let index = usize::try_from(id.seq.checked_sub(1)?).ok()?;
        self.by_character.get(&id.character)?.get(index)
    }

    pub fn latest(&self, character: CharacterId) -> Option<&LedgerEntry> {
        self.by_character.get(&character)?.last()
    }

    pub fn find_by_seed(&self, character: CharacterId, derived_seed: u64) -> Option<&LedgerEntry> {
        self.get(*self.by_seed.get(&(character, derived_seed))?)
    }

    pub fn query(&self, character: CharacterId, range: &TimeRange) -> Vec<LedgerEntry> {
        self.by_character
            .get(&character)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| range.contains(e.record.timestamp))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn all(&self) -> Vec<LedgerEntry> {
        self.by_character.values().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_character.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_range() {
        let now = Utc::now();
        let range = TimeRange::between(now - Duration::seconds(10), now);

        assert!(range.contains(now));
        assert!(range.contains(now - Duration::seconds(10)));
        assert!(!range.contains(now + Duration::seconds(1)));
        assert!(TimeRange::all().contains(now));
        assert!(!TimeRange::since(now).contains(now - Duration::seconds(1)));
    }

    #[test]
    fn test_index_sequences_per_character() {
        let index = LedgerIndex::default();
        assert_eq!(index.next_id(CharacterId(4)), LedgerId::new(CharacterId(4), 1));
        assert!(index.get(LedgerId::new(CharacterId(4), 0)).is_none());
    }

    #[test]
    fn test_index_tracks_latest_and_seeds() {
        let mut index = LedgerIndex::default();
        for (seq, seed) in [(1, 42), (2, 7), (3, 42)] {
            let record = crate::test_support::record(4, seed);
            index.push(LedgerEntry::new(LedgerId::new(CharacterId(4), seq), record));
        }

        assert_eq!(index.latest(CharacterId(4)).unwrap().id.seq, 3);
        assert_eq!(index.find_by_seed(CharacterId(4), 42).unwrap().id.seq, 3);
        assert_eq!(index.find_by_seed(CharacterId(4), 7).unwrap().id.seq, 2);
        assert!(index.find_by_seed(CharacterId(5), 42).is_none());
        assert!(index.latest(CharacterId(5)).is_none());
    }
}
