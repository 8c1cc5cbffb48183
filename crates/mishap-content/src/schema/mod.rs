//! Schema definitions for RON content files
//!
//! Every definition kind comes in two shapes: a `Raw*` form that mirrors the
//! file exactly (axis and trigger names as plain strings) and a validated
//! form the rest of the workspace uses. Validation happens per definition so
//! one bad entry never takes the whole file down with it.

pub mod action;
pub mod environment;
pub mod failing;
pub mod item;
pub mod quirk;
pub mod reputation;
pub mod useless_bit;

pub use action::ActionDef;
pub use environment::EnvironmentalQuirkDef;
pub use failing::FailingDef;
pub use item::{Interaction, InteractionEffect, ItemQuirkDef, ItemTypeDef};
pub use quirk::QuirkDef;
pub use reputation::ReputationBias;
pub use useless_bit::UselessBitDef;

use mishap_core::{AxisModifiers, DefId, Trigger};
use ron::value::RawValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How much a trait matters when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Minor,
    Moderate,
    Major,
}

/// Whether a quirk is known to its owner from the start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Discovery {
    #[default]
    Visible,
    /// Hidden until it first triggers
    Hidden,
}

/// One content file; every section is optional
///
/// Sections hold each definition as raw RON text so a definition that does
/// not even deserialize is rejected on its own.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ContentFile {
    #[serde(default)]
    pub quirks: Vec<Box<RawValue>>,
    #[serde(default)]
    pub failings: Vec<Box<RawValue>>,
    #[serde(default)]
    pub useless_bits: Vec<Box<RawValue>>,
    #[serde(default)]
    pub item_quirks: Vec<Box<RawValue>>,
    #[serde(default)]
    pub item_types: Vec<Box<RawValue>>,
    #[serde(default)]
    pub environmental_quirks: Vec<Box<RawValue>>,
    #[serde(default)]
    pub actions: Vec<Box<RawValue>>,
    #[serde(default)]
    pub reputation_biases: Vec<Box<RawValue>>,
}

/// Just the id of a definition, for naming one that failed to deserialize
#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    pub id: DefId,
}

/// Largest magnitude any content integer may carry
///
/// Keeps every sum the resolver forms far away from `i32` overflow.
pub const CONTENT_VALUE_LIMIT: i32 = 1_000;

pub(crate) type Validated<T> = std::result::Result<T, String>;

pub(crate) fn parse_modifiers(raw: &BTreeMap<String, i32>) -> Validated<AxisModifiers> {
    for (axis, value) in raw {
        check_bounded(&format!("modifier '{}'", axis), *value)?;
    }
    AxisModifiers::parse(raw.iter().map(|(k, v)| (k.as_str(), *v))).map_err(|e| e.to_string())
}

pub(crate) fn parse_triggers(raw: &[String]) -> Validated<Vec<Trigger>> {
    if raw.is_empty() {
        return Err("at least one trigger condition is required".to_string());
    }
    raw.iter()
        .map(|name| name.parse::<Trigger>().map_err(|e| e.to_string()))
        .collect()
}

pub(crate) fn check_bounded(what: &str, value: i32) -> Validated<i32> {
    if (-CONTENT_VALUE_LIMIT..=CONTENT_VALUE_LIMIT).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "{} must be within ±{}, got {}",
            what, CONTENT_VALUE_LIMIT, value
        ))
    }
}

pub(crate) fn check_weight(weight: f64) -> Validated<f64> {
    if weight.is_finite() && weight > 0.0 {
        Ok(weight)
    } else {
        Err(format!("rarity weight must be > 0, got {}", weight))
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_triggers() -> Vec<String> {
    vec!["always".to_string()]
}
