//! File-backed ledger: one JSON object per line, append-only

use crate::error::{Error, Result};
use crate::store::{LedgerIndex, LedgerStore, TimeRange};
use mishap_core::{ActionRecord, CharacterId, LedgerEntry, LedgerId};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

struct Inner {
    file: File,
    /// Bytes known to hold complete lines
    committed_len: u64,
    index: LedgerIndex,
}

/// Ledger persisted as a JSON-lines file
///
/// Every append is written as a single line and synced before its id is
/// returned. On open the whole file is read back to rebuild the index; a
/// trailing line without its newline is a torn write and is cut off.
pub struct JsonlLedger {
    path: PathBuf,
    inner: Mutex<Inner>,
}

impl JsonlLedger {
    /// Open or create a ledger file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let complete = bytes
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);
        if complete < bytes.len() {
            warn!(
                path = %path.display(),
                dropped = bytes.len() - complete,
                "truncating torn trailing ledger line"
            );
            file.set_len(complete as u64)?;
            file.sync_data()?;
        }

        let text = std::str::from_utf8(&bytes[..complete]).map_err(|e| Error::Corrupt {
            line: 0,
            reason: e.to_string(),
        })?;
        let index = Self::rebuild(text)?;

        info!(path = %path.display(), entries = index.len(), "opened ledger");
        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                file,
                committed_len: complete as u64,
                index,
            }),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rebuild(text: &str) -> Result<LedgerIndex> {
        let mut index = LedgerIndex::default();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: LedgerEntry = serde_json::from_str(line).map_err(|e| Error::Corrupt {
                line: n + 1,
                reason: e.to_string(),
            })?;
            let expected = index.next_id(entry.id.character);
            if entry.id != expected {
                return Err(Error::Corrupt {
                    line: n + 1,
                    reason: format!("expected {}, found {}", expected, entry.id),
                });
            }
            index.push(entry);
        }
        Ok(index)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| Error::LockPoisoned)
    }
}

impl LedgerStore for JsonlLedger {
    fn append(&self, record: ActionRecord) -> Result<LedgerId> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let id = inner.index.next_id(record.character);
        let entry = LedgerEntry::new(id, record);

        let mut line =
            serde_json::to_string(&entry).map_err(|e| Error::Serialization(e.to_string()))?;
        line.push('\n');

        let file = &mut inner.file;
        let written = file.write_all(line.as_bytes()).and_then(|_| file.sync_data());
        if let Err(e) = written {
            // Cut back to the last complete line so a later append cannot
            // land behind a fragment.
            if let Err(undo) = inner.file.set_len(inner.committed_len) {
                warn!(error = %undo, "could not roll back partial ledger write");
            }
            return Err(Error::Persistence(e.to_string()));
        }

        inner.committed_len += line.len() as u64;
        inner.index.push(entry);
        debug!(%id, path = %self.path.display(), "appended ledger entry");
        Ok(id)
    }

    fn get(&self, id: LedgerId) -> Result<Option<LedgerEntry>> {
        Ok(self.lock()?.index.get(id).cloned())
    }

    fn query(&self, character: CharacterId, range: &TimeRange) -> Result<Vec<LedgerEntry>> {
        Ok(self.lock()?.index.query(character, range))
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.lock()?.index.all())
    }

    fn name(&self) -> &str {
        "jsonl"
    }

    fn latest_for(&self, character: CharacterId) -> Result<Option<LedgerEntry>> {
        Ok(self.lock()?.index.latest(character).cloned())
    }

    fn find_by_seed(&self, character: CharacterId, derived_seed: u64) -> Result<Option<LedgerEntry>> {
        Ok(self.lock()?.index.find_by_seed(character, derived_seed).cloned())
    }
}

impl std::fmt::Debug for JsonlLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonlLedger")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
