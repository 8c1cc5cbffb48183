//! Environmental quirk definition schema

use super::{parse_modifiers, Severity, Validated};
use mishap_core::{AxisModifiers, DefId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A property of a room that bends every action taken in it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalQuirkDef {
    pub id: DefId,
    /// Empty means every room type
    pub room_types: Vec<DefId>,
    pub modifiers: AxisModifiers,
    /// Empty means every action
    pub action_types: Vec<DefId>,
    pub severity: Severity,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawEnvironmentalQuirkDef {
    pub id: DefId,
    #[serde(default)]
    pub room_types: Vec<DefId>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub action_types: Vec<DefId>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

impl RawEnvironmentalQuirkDef {
    pub fn validate(self) -> Validated<EnvironmentalQuirkDef> {
        Ok(EnvironmentalQuirkDef {
            modifiers: parse_modifiers(&self.modifiers)?,
            id: self.id,
            room_types: self.room_types,
            action_types: self.action_types,
            severity: self.severity,
            description: self.description,
        })
    }
}

impl EnvironmentalQuirkDef {
    pub fn new(id: impl Into<DefId>, modifiers: AxisModifiers) -> Self {
        Self {
            id: id.into(),
            room_types: Vec::new(),
            modifiers,
            action_types: Vec::new(),
            severity: Severity::Minor,
            description: String::new(),
        }
    }

    pub fn in_room_type(mut self, room_type: impl Into<DefId>) -> Self {
        self.room_types.push(room_type.into());
        self
    }
}
