//! Action type definition schema

use super::{check_bounded, parse_modifiers, Validated};
use mishap_core::{AxisModifiers, DefId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A kind of action a character can attempt, and how harshly it is judged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDef {
    pub id: DefId,
    /// Timing or precision deviations beyond this magnitude break the action
    pub deviation_threshold: i32,
    /// Once broken, a stability final value below this cascades to failure
    pub stability_floor: i32,
    /// Deviation draws fall in `[-spread, spread]`
    pub deviation_spread: i32,
    pub high_risk: bool,
    /// Item types the action expects; empty means it is always unarmed-safe
    pub item_types: Vec<DefId>,
    /// Substituted when none of the expected items is at hand
    pub unarmed_modifiers: AxisModifiers,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawActionDef {
    pub id: DefId,
    #[serde(default = "default_threshold")]
    pub deviation_threshold: i32,
    #[serde(default)]
    pub stability_floor: i32,
    #[serde(default = "default_spread")]
    pub deviation_spread: i32,
    #[serde(default)]
    pub high_risk: bool,
    #[serde(default)]
    pub item_types: Vec<DefId>,
    #[serde(default)]
    pub unarmed_modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub description: String,
}

fn default_threshold() -> i32 {
    2
}

fn default_spread() -> i32 {
    3
}

impl RawActionDef {
    pub fn validate(self) -> Validated<ActionDef> {
        if self.deviation_threshold < 0 {
            return Err(format!(
                "deviation threshold must be >= 0, got {}",
                self.deviation_threshold
            ));
        }
        if self.deviation_spread < 0 {
            return Err(format!(
                "deviation spread must be >= 0, got {}",
                self.deviation_spread
            ));
        }
        check_bounded("deviation threshold", self.deviation_threshold)?;
        check_bounded("stability floor", self.stability_floor)?;
        check_bounded("deviation spread", self.deviation_spread)?;
        Ok(ActionDef {
            unarmed_modifiers: parse_modifiers(&self.unarmed_modifiers)?,
            id: self.id,
            deviation_threshold: self.deviation_threshold,
            stability_floor: self.stability_floor,
            deviation_spread: self.deviation_spread,
            high_risk: self.high_risk,
            item_types: self.item_types,
            description: self.description,
        })
    }
}

impl ActionDef {
    pub fn new(id: impl Into<DefId>) -> Self {
        Self {
            id: id.into(),
            deviation_threshold: default_threshold(),
            stability_floor: 0,
            deviation_spread: default_spread(),
            high_risk: false,
            item_types: Vec::new(),
            unarmed_modifiers: AxisModifiers::new(),
            description: String::new(),
        }
    }

    pub fn expects_items(&self) -> bool {
        !self.item_types.is_empty()
    }
}
