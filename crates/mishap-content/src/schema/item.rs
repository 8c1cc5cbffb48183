//! Item quirk and item type schemas

use super::{parse_modifiers, Validated};
use mishap_core::{AxisModifiers, DefId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of an item/character quirk interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionEffect {
    /// The character quirk's modifiers count again
    Amplify,
    /// Half of the character quirk's modifiers are cancelled
    Dampen,
}

impl InteractionEffect {
    /// Extra modifiers contributed by the pairing
    pub fn apply(&self, quirk_modifiers: &AxisModifiers) -> AxisModifiers {
        match self {
            InteractionEffect::Amplify => quirk_modifiers.clone(),
            InteractionEffect::Dampen => quirk_modifiers.map_values(|v| -(v / 2)),
        }
    }
}

/// One row of an item quirk's interaction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub effect: InteractionEffect,
    #[serde(default)]
    pub note: String,
}

/// A property of an item that modifies axes for certain actions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemQuirkDef {
    pub id: DefId,
    pub modifiers: AxisModifiers,
    /// Empty means every action
    pub action_types: Vec<DefId>,
    /// Character quirk id -> interaction
    pub interactions: BTreeMap<DefId, Interaction>,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawItemQuirkDef {
    pub id: DefId,
    #[serde(default)]
    pub modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub action_types: Vec<DefId>,
    #[serde(default)]
    pub interactions: BTreeMap<DefId, Interaction>,
    #[serde(default)]
    pub description: String,
}

impl RawItemQuirkDef {
    pub fn validate(self) -> Validated<ItemQuirkDef> {
        Ok(ItemQuirkDef {
            modifiers: parse_modifiers(&self.modifiers)?,
            id: self.id,
            action_types: self.action_types,
            interactions: self.interactions,
            description: self.description,
        })
    }
}

impl ItemQuirkDef {
    pub fn new(id: impl Into<DefId>, modifiers: AxisModifiers) -> Self {
        Self {
            id: id.into(),
            modifiers,
            action_types: Vec::new(),
            interactions: BTreeMap::new(),
            description: String::new(),
        }
    }

    pub fn for_action(mut self, action: impl Into<DefId>) -> Self {
        self.action_types.push(action.into());
        self
    }

    pub fn with_interaction(mut self, quirk: impl Into<DefId>, effect: InteractionEffect) -> Self {
        self.interactions.insert(
            quirk.into(),
            Interaction {
                effect,
                note: String::new(),
            },
        );
        self
    }

    pub fn applies_to(&self, action: &DefId) -> bool {
        self.action_types.is_empty() || self.action_types.contains(action)
    }
}

/// A kind of item and the quirks every instance of it starts with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeDef {
    pub id: DefId,
    #[serde(default)]
    pub default_quirks: Vec<DefId>,
    #[serde(default)]
    pub description: String,
}
