//! Character quirk definition schema

use super::{check_weight, parse_modifiers, parse_triggers, Discovery, Severity, Validated};
use mishap_core::{AxisModifiers, DefId, Trigger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mechanical trait on a character that conditionally modifies axes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuirkDef {
    pub id: DefId,
    pub category: DefId,
    /// Sampling weight at issuance; always > 0
    pub rarity_weight: f64,
    /// Any one matching trigger includes the quirk
    pub triggers: Vec<Trigger>,
    pub modifiers: AxisModifiers,
    pub severity: Severity,
    pub discovery: Discovery,
    /// Turns an otherwise avoidable failure into a fortunate one
    pub reinterprets_failure: bool,
    pub description: String,
}

/// Quirk as written in a content file
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawQuirkDef {
    pub id: DefId,
    #[serde(default = "default_category")]
    pub category: DefId,
    #[serde(default = "super::default_weight")]
    pub rarity_weight: f64,
    #[serde(default = "super::default_triggers")]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub discovery: Discovery,
    #[serde(default)]
    pub reinterprets_failure: bool,
    #[serde(default)]
    pub description: String,
}

fn default_category() -> DefId {
    DefId::new("general")
}

impl RawQuirkDef {
    pub fn validate(self) -> Validated<QuirkDef> {
        Ok(QuirkDef {
            rarity_weight: check_weight(self.rarity_weight)?,
            triggers: parse_triggers(&self.triggers)?,
            modifiers: parse_modifiers(&self.modifiers)?,
            id: self.id,
            category: self.category,
            severity: self.severity,
            discovery: self.discovery,
            reinterprets_failure: self.reinterprets_failure,
            description: self.description,
        })
    }
}

impl QuirkDef {
    /// Build a quirk in code (tests, tooling)
    pub fn new(id: impl Into<DefId>, trigger: Trigger, modifiers: AxisModifiers) -> Self {
        Self {
            id: id.into(),
            category: default_category(),
            rarity_weight: 1.0,
            triggers: vec![trigger],
            modifiers,
            severity: Severity::Minor,
            discovery: Discovery::Visible,
            reinterprets_failure: false,
            description: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<DefId>) -> Self {
        self.category = category.into();
        self
    }

    pub fn reinterpreting_failure(mut self) -> Self {
        self.reinterprets_failure = true;
        self
    }
}
