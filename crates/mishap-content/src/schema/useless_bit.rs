//! Useless bit definition schema

use super::{parse_modifiers, parse_triggers, Validated};
use mishap_core::{AxisModifiers, DefId, Trigger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A narrow specialization whose bonus is paid for by a matching penalty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UselessBitDef {
    pub id: DefId,
    pub triggers: Vec<Trigger>,
    pub bonus: AxisModifiers,
    pub penalty: AxisModifiers,
    pub rarity_weight: f64,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawUselessBitDef {
    pub id: DefId,
    #[serde(default = "super::default_triggers")]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub bonus: BTreeMap<String, i32>,
    #[serde(default)]
    pub penalty: BTreeMap<String, i32>,
    #[serde(default = "super::default_weight")]
    pub rarity_weight: f64,
    #[serde(default)]
    pub description: String,
}

impl RawUselessBitDef {
    pub fn validate(self) -> Validated<UselessBitDef> {
        Ok(UselessBitDef {
            rarity_weight: super::check_weight(self.rarity_weight)?,
            triggers: parse_triggers(&self.triggers)?,
            bonus: parse_modifiers(&self.bonus)?,
            penalty: parse_modifiers(&self.penalty)?,
            id: self.id,
            description: self.description,
        })
    }
}

impl UselessBitDef {
    /// Bonus and penalty combined
    pub fn combined(&self) -> AxisModifiers {
        let mut total = self.bonus.clone();
        total.merge(&self.penalty);
        total
    }

    /// Useless bits are meant to net out at zero or below
    pub fn nets_positive(&self) -> bool {
        self.combined().net() > 0
    }
}
