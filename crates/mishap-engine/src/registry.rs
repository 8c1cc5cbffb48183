//! Records supplied by the engine's collaborators
//!
//! Characters, items and rooms are owned elsewhere (issuance, forging, the
//! world); the registry is the engine's read-mostly view of them. Characters
//! only ever change through [`Registry::deactivate`] and
//! [`Registry::update_reputation`]. Items never change; who holds them can.

use crate::error::{Error, Result};
use mishap_core::{Character, CharacterId, DefId, Item, ItemId, Reputation, RoomId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A room as described by the world collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_type: DefId,
    #[serde(default)]
    pub environmental_quirks: Vec<DefId>,
    #[serde(default)]
    pub npc_present: bool,
}

impl Room {
    pub fn new(id: impl Into<RoomId>, room_type: impl Into<DefId>) -> Self {
        Self {
            id: id.into(),
            room_type: room_type.into(),
            environmental_quirks: Vec::new(),
            npc_present: false,
        }
    }

    pub fn with_quirk(mut self, quirk: impl Into<DefId>) -> Self {
        self.environmental_quirks.push(quirk.into());
        self
    }

    pub fn with_npc(mut self) -> Self {
        self.npc_present = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Holding {
    item: Item,
    holder: CharacterId,
}

/// Lookup tables for characters, items and rooms
#[derive(Debug, Default)]
pub struct Registry {
    characters: HashMap<CharacterId, Character>,
    items: HashMap<ItemId, Holding>,
    rooms: HashMap<RoomId, Room>,
    next_item: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a character; an existing record with the same id is kept
    ///
    /// Returns false when the id was already registered.
    pub fn insert_character(&mut self, character: Character) -> bool {
        if self.characters.contains_key(&character.id()) {
            return false;
        }
        self.characters.insert(character.id(), character);
        true
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn deactivate(&mut self, id: CharacterId) -> Result<()> {
        self.characters
            .get_mut(&id)
            .ok_or(Error::CharacterNotFound(id))?
            .deactivate();
        Ok(())
    }

    pub fn update_reputation(&mut self, id: CharacterId, reputation: Reputation) -> Result<()> {
        self.characters
            .get_mut(&id)
            .ok_or(Error::CharacterNotFound(id))?
            .update_reputation(reputation);
        Ok(())
    }

    /// Reserve the next item id
    pub fn next_item_id(&mut self) -> ItemId {
        self.next_item += 1;
        ItemId(self.next_item)
    }

    /// Register an item in someone's possession
    pub fn insert_item(&mut self, item: Item, holder: CharacterId) {
        self.next_item = self.next_item.max(item.id.raw());
        self.items.insert(item.id, Holding { item, holder });
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id).map(|h| &h.item)
    }

    pub fn holder(&self, id: ItemId) -> Option<CharacterId> {
        self.items.get(&id).map(|h| h.holder)
    }

    /// Hand an item to another character
    pub fn transfer(&mut self, id: ItemId, to: CharacterId) -> Result<()> {
        if !self.characters.contains_key(&to) {
            return Err(Error::CharacterNotFound(to));
        }
        self.items
            .get_mut(&id)
            .ok_or(Error::ItemNotFound(id))?
            .holder = to;
        Ok(())
    }

    /// The requested items `character` actually holds, in request order
    ///
    /// Unknown items and items held by someone else are left out.
    pub fn possessed_by(&self, character: CharacterId, requested: &[ItemId]) -> Vec<Item> {
        requested
            .iter()
            .filter_map(|id| self.items.get(id))
            .filter(|h| h.holder == character)
            .map(|h| h.item.clone())
            .collect()
    }

    pub fn insert_room(&mut self, room: Room) {
        self.rooms.insert(room.id.clone(), room);
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::Forge;
    use crate::issuer::Issuer;
    use chrono::Utc;
    use mishap_content::Loader;

    #[test]
    fn test_possession_filters_requested_items() {
        let library = Loader::builtin().unwrap();
        let issuer = Issuer::new(&library);
        let alice = issuer.issue("alice", "f", "a").unwrap();
        let bob = issuer.issue("bob", "m", "b").unwrap();

        let mut registry = Registry::new();
        registry.insert_character(alice.clone());
        registry.insert_character(bob.clone());

        let forge = Forge::new(&library);
        let rod_id = registry.next_item_id();
        let rod = forge
            .create(rod_id, &DefId::new("fishing_rod"), &alice, &[], Utc::now())
            .unwrap();
        registry.insert_item(rod, alice.id());

        let requested = [ItemId(99), rod_id];
        assert_eq!(registry.possessed_by(alice.id(), &requested).len(), 1);
        assert!(registry.possessed_by(bob.id(), &requested).is_empty());

        registry.transfer(rod_id, bob.id()).unwrap();
        assert_eq!(registry.holder(rod_id), Some(bob.id()));
        assert!(registry.possessed_by(alice.id(), &requested).is_empty());
        assert!(registry.transfer(ItemId(99), bob.id()).is_err());
    }

    #[test]
    fn test_character_mutations_are_limited() {
        let library = Loader::builtin().unwrap();
        let character = Issuer::new(&library).issue("acct", "x", "s").unwrap();
        let id = character.id();

        let mut registry = Registry::new();
        assert!(registry.insert_character(character.clone()));
        assert!(!registry.insert_character(character));

        registry.update_reputation(id, Reputation::new(3, "rescued a goose")).unwrap();
        registry.deactivate(id).unwrap();

        let stored = registry.character(id).unwrap();
        assert_eq!(stored.reputation().score, 3);
        assert!(!stored.is_active());
        assert!(registry.deactivate(CharacterId(0)).is_err());
    }
}
