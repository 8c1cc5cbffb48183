//! The validated, read-only content library

use crate::schema::{
    ActionDef, EnvironmentalQuirkDef, FailingDef, ItemQuirkDef, ItemTypeDef, QuirkDef,
    ReputationBias, UselessBitDef,
};
use indexmap::IndexMap;
use mishap_core::DefId;

/// Every definition the engine may consult, keyed by id in load order
///
/// Only [`crate::Loader`] can build one, so a `ContentLibrary` value is
/// always validated. Share it behind an `Arc`; nothing here mutates.
#[derive(Debug, Default, Clone)]
pub struct ContentLibrary {
    pub(crate) quirks: IndexMap<DefId, QuirkDef>,
    pub(crate) failings: IndexMap<DefId, FailingDef>,
    pub(crate) useless_bits: IndexMap<DefId, UselessBitDef>,
    pub(crate) item_quirks: IndexMap<DefId, ItemQuirkDef>,
    pub(crate) item_types: IndexMap<DefId, ItemTypeDef>,
    pub(crate) environmental_quirks: IndexMap<DefId, EnvironmentalQuirkDef>,
    pub(crate) actions: IndexMap<DefId, ActionDef>,
    pub(crate) reputation_biases: IndexMap<DefId, ReputationBias>,
}

impl ContentLibrary {
    pub fn quirk(&self, id: &DefId) -> Option<&QuirkDef> {
        self.quirks.get(id)
    }

    pub fn failing(&self, id: &DefId) -> Option<&FailingDef> {
        self.failings.get(id)
    }

    pub fn useless_bit(&self, id: &DefId) -> Option<&UselessBitDef> {
        self.useless_bits.get(id)
    }

    pub fn item_quirk(&self, id: &DefId) -> Option<&ItemQuirkDef> {
        self.item_quirks.get(id)
    }

    pub fn item_type(&self, id: &DefId) -> Option<&ItemTypeDef> {
        self.item_types.get(id)
    }

    pub fn environmental_quirk(&self, id: &DefId) -> Option<&EnvironmentalQuirkDef> {
        self.environmental_quirks.get(id)
    }

    pub fn action(&self, id: &DefId) -> Option<&ActionDef> {
        self.actions.get(id)
    }

    pub fn quirks(&self) -> impl Iterator<Item = &QuirkDef> {
        self.quirks.values()
    }

    pub fn failings(&self) -> impl Iterator<Item = &FailingDef> {
        self.failings.values()
    }

    pub fn useless_bits(&self) -> impl Iterator<Item = &UselessBitDef> {
        self.useless_bits.values()
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionDef> {
        self.actions.values()
    }

    pub fn reputation_biases(&self) -> impl Iterator<Item = &ReputationBias> {
        self.reputation_biases.values()
    }

    /// Quirks in one category, in load order
    pub fn quirks_by_category<'a>(&'a self, category: &'a DefId) -> impl Iterator<Item = &'a QuirkDef> {
        self.quirks.values().filter(move |q| &q.category == category)
    }

    /// Whether an id is taken in the shared character-trait namespace
    pub fn is_trait_id(&self, id: &DefId) -> bool {
        self.quirks.contains_key(id)
            || self.failings.contains_key(id)
            || self.useless_bits.contains_key(id)
    }

    /// Total number of definitions across every kind
    pub fn len(&self) -> usize {
        self.quirks.len()
            + self.failings.len()
            + self.useless_bits.len()
            + self.item_quirks.len()
            + self.item_types.len()
            + self.environmental_quirks.len()
            + self.actions.len()
            + self.reputation_biases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
