//! The engine facade: issuance, forging and resolution behind one handle

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::forge::Forge;
use crate::issuer::Issuer;
use crate::locks::CharacterLocks;
use crate::registry::{Registry, Room};
use crate::resolver::{Resolution, Resolver};
use chrono::Utc;
use mishap_content::{ContentLibrary, Loader};
use mishap_core::{
    Character, CharacterId, DefId, Item, ItemId, LedgerEntry, LedgerId, Reputation, RoomId,
};
use mishap_ledger::{LedgerStore, MemoryLedger};
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, instrument, warn};

/// One action a character attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub character: CharacterId,
    pub action: DefId,
    pub room: RoomId,
    pub items: Vec<ItemId>,
    /// Explicit seed; the engine generates one when absent
    pub seed: Option<String>,
    pub rushed: bool,
}

impl ActionRequest {
    pub fn new(character: CharacterId, action: impl Into<DefId>, room: impl Into<RoomId>) -> Self {
        Self {
            character,
            action: action.into(),
            room: room.into(),
            items: Vec::new(),
            seed: None,
            rushed: false,
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = ItemId>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = Some(seed.into());
        self
    }

    pub fn rushed(mut self) -> Self {
        self.rushed = true;
        self
    }
}

/// Resolution engine with its content, records and ledger
///
/// `Engine` is `Send + Sync`. Actions for one character are serialized by a
/// per-character lock held across compute and append, so that character's
/// ledger sequence follows action order; different characters resolve in
/// parallel.
pub struct Engine {
    library: Arc<ContentLibrary>,
    config: EngineConfig,
    registry: RwLock<Registry>,
    ledger: Arc<dyn LedgerStore>,
    locks: CharacterLocks,
}

impl Engine {
    pub fn new(
        library: Arc<ContentLibrary>,
        ledger: Arc<dyn LedgerStore>,
        config: EngineConfig,
    ) -> Self {
        info!(
            ledger = ledger.name(),
            definitions = library.len(),
            "engine ready"
        );
        Self {
            library,
            config,
            registry: RwLock::new(Registry::new()),
            ledger,
            locks: CharacterLocks::new(),
        }
    }

    /// Built-in content with an in-memory ledger
    pub fn with_builtin_content(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let library = Loader::builtin()?;
        Ok(Self::new(
            Arc::new(library),
            Arc::new(MemoryLedger::new()),
            config,
        ))
    }

    /// Load content from a directory of RON files
    ///
    /// Malformed definitions are skipped unless the config asks for strict
    /// loading.
    pub fn load_content(
        path: impl AsRef<Path>,
        ledger: Arc<dyn LedgerStore>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let mut loader = Loader::new().strict(config.strict_content);
        loader.load_directory(path)?;
        let (library, report) = loader.finish()?;
        if !report.is_clean() {
            warn!(
                rejected = report.rejected.len(),
                "content loaded with rejected definitions"
            );
        }
        Ok(Self::new(Arc::new(library), ledger, config))
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &dyn LedgerStore {
        self.ledger.as_ref()
    }

    /// Issue and register a character
    ///
    /// Issuing the same inputs again returns the already registered record.
    pub fn issue_character(&self, account_ref: &str, sex: &str, seed: &str) -> Result<Character> {
        let character = Issuer::new(&self.library).issue(account_ref, sex, seed)?;
        let mut registry = self.write_registry()?;
        if !registry.insert_character(character.clone()) {
            if let Some(existing) = registry.character(character.id()) {
                return Ok(existing.clone());
            }
        }
        Ok(character)
    }

    /// Register a character issued elsewhere
    pub fn register_character(&self, character: Character) -> Result<()> {
        self.write_registry()?.insert_character(character);
        Ok(())
    }

    pub fn character(&self, id: CharacterId) -> Result<Option<Character>> {
        Ok(self.read_registry()?.character(id).cloned())
    }

    pub fn deactivate_character(&self, id: CharacterId) -> Result<()> {
        self.write_registry()?.deactivate(id)
    }

    pub fn update_reputation(&self, id: CharacterId, reputation: Reputation) -> Result<()> {
        self.write_registry()?.update_reputation(id, reputation)
    }

    /// Forge an item; the creator holds it afterwards
    pub fn create_item(
        &self,
        item_type: impl Into<DefId>,
        creator: CharacterId,
        custom_quirks: &[DefId],
    ) -> Result<Item> {
        let item_type = item_type.into();
        let mut registry = self.write_registry()?;
        let maker = registry
            .character(creator)
            .cloned()
            .ok_or(Error::CharacterNotFound(creator))?;

        let id = registry.next_item_id();
        let item = Forge::new(&self.library).create(id, &item_type, &maker, custom_quirks, Utc::now())?;
        registry.insert_item(item.clone(), creator);
        Ok(item)
    }

    pub fn item(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.read_registry()?.item(id).cloned())
    }

    /// Hand an item to another character
    pub fn transfer_item(&self, item: ItemId, to: CharacterId) -> Result<()> {
        self.write_registry()?.transfer(item, to)
    }

    /// Register or replace a room description
    pub fn register_room(&self, room: Room) -> Result<()> {
        self.write_registry()?.insert_room(room);
        Ok(())
    }

    /// Resolve an action and commit it to the ledger
    ///
    /// Nothing is written when the character, room or action is rejected.
    /// A retry with a seed that was already used appends a new entry that
    /// supersedes the earlier one.
    #[instrument(skip(self, request), fields(
        character = %request.character,
        action = %request.action,
        room = %request.room,
    ))]
    pub fn resolve(&self, request: ActionRequest) -> Result<LedgerEntry> {
        // only registered characters ever get an ordering lock
        if self.read_registry()?.character(request.character).is_none() {
            return Err(Error::CharacterNotFound(request.character));
        }
        let lock = self.locks.for_character(request.character)?;
        let _ordered = lock
            .lock()
            .map_err(|_| Error::LockPoisoned("character lock"))?;

        let (character, room, possessed) = {
            let registry = self.read_registry()?;
            let character = registry
                .character(request.character)
                .cloned()
                .ok_or(Error::CharacterNotFound(request.character))?;
            if !character.is_active() {
                return Err(Error::CharacterInactive(character.id()));
            }
            let room = registry
                .room(&request.room)
                .cloned()
                .ok_or_else(|| Error::RoomNotFound(request.room.clone()))?;
            let possessed = registry.possessed_by(character.id(), &request.items);
            (character, room, possessed)
        };

        let action = self
            .library
            .action(&request.action)
            .ok_or_else(|| Error::InvalidActionType(request.action.clone()))?;

        if possessed.len() < request.items.len() {
            warn!(
                requested = request.items.len(),
                possessed = possessed.len(),
                "resolving without items the character does not hold"
            );
        }

        let seed = match request.seed {
            Some(seed) => seed,
            None => self.generated_seed(character.id())?,
        };

        let mut record = Resolver::new(&self.library, self.config.avoidable_threshold).compute(
            &Resolution {
                character: &character,
                action,
                room: &room,
                requested_items: &request.items,
                possessed_items: &possessed,
                rushed: request.rushed,
                seed: &seed,
                timestamp: Utc::now(),
            },
        );

        record.supersedes = self
            .ledger
            .find_by_seed(character.id(), record.derived_seed)?
            .map(|previous| previous.id);

        let id = self
            .ledger
            .append(record.clone())
            .map_err(Error::LedgerCommit)?;

        info!(
            %id,
            outcome = %record.outcome,
            interpretation = %record.interpretation,
            supersedes = ?record.supersedes,
            "action committed"
        );
        Ok(LedgerEntry::new(id, record))
    }

    /// Recompute a committed entry and check it still resolves the same way
    ///
    /// Uses the character's current possessions; an item handed away since
    /// the entry was written changes the result.
    #[instrument(skip(self))]
    pub fn verify(&self, id: LedgerId) -> Result<bool> {
        let entry = self.ledger.get(id)?.ok_or(Error::EntryNotFound(id))?;
        let record = &entry.record;

        let (character, room, possessed) = {
            let registry = self.read_registry()?;
            let character = registry
                .character(record.character)
                .cloned()
                .ok_or(Error::CharacterNotFound(record.character))?;
            let room = registry
                .room(&record.room)
                .cloned()
                .ok_or_else(|| Error::RoomNotFound(record.room.clone()))?;
            let possessed = registry.possessed_by(character.id(), &record.items_used);
            (character, room, possessed)
        };
        let action = self
            .library
            .action(&record.action)
            .ok_or_else(|| Error::InvalidActionType(record.action.clone()))?;

        let replayed = Resolver::new(&self.library, self.config.avoidable_threshold).compute(
            &Resolution {
                character: &character,
                action,
                room: &room,
                requested_items: &record.items_used,
                possessed_items: &possessed,
                rushed: record.rushed,
                seed: &record.seed,
                timestamp: record.timestamp,
            },
        );

        let matches = replayed.same_resolution(record);
        if !matches {
            warn!(%id, "ledger entry no longer reproduces");
        }
        Ok(matches)
    }

    /// Seed for a call that supplied none: unique per ledger position
    fn generated_seed(&self, character: CharacterId) -> Result<String> {
        let next = self
            .ledger
            .latest_for(character)?
            .map_or(1, |entry| entry.id.seq + 1);
        Ok(format!(
            "{}-{}",
            self.config.default_seed_prefix,
            LedgerId::new(character, next)
        ))
    }

    fn read_registry(&self) -> Result<RwLockReadGuard<'_, Registry>> {
        self.registry
            .read()
            .map_err(|_| Error::LockPoisoned("registry"))
    }

    fn write_registry(&self) -> Result<RwLockWriteGuard<'_, Registry>> {
        self.registry
            .write()
            .map_err(|_| Error::LockPoisoned("registry"))
    }
}
