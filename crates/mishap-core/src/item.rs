//! Forged item records

use crate::attribute::AttributeSet;
use crate::character::Character;
use crate::identity::{CharacterId, DefId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frozen copy of the creator as they were when the item was made
///
/// Owned and deep-copied: later changes to (or deactivation of) the creator
/// never reach existing items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakerProfile {
    pub creator: CharacterId,
    pub attributes: AttributeSet,
    pub quirks: Vec<DefId>,
    pub captured_at: DateTime<Utc>,
}

impl MakerProfile {
    /// Snapshot a character's attributes and quirk ids
    pub fn capture(creator: &Character, at: DateTime<Utc>) -> Self {
        Self {
            creator: creator.id(),
            attributes: *creator.attributes(),
            quirks: creator.quirks().to_vec(),
            captured_at: at,
        }
    }
}

/// An item; immutable once forged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub item_type: DefId,
    pub creator: CharacterId,
    pub maker_profile: MakerProfile,
    pub quirks: Vec<DefId>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// An item with no quirks resolves as a modifier-neutral baseline
    pub fn is_baseline(&self) -> bool {
        self.quirks.is_empty()
    }
}
