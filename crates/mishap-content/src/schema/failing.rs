//! Failing definition schema

use super::{check_bounded, check_weight, parse_modifiers, parse_triggers, Severity, Validated};
use mishap_core::{Attribute, AttributeSet, AxisModifiers, DefId, Trigger, ATTRIBUTE_MAX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A persistent deficiency that degrades outcomes without disabling them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailingDef {
    pub id: DefId,
    pub severity: Severity,
    pub affected_attributes: Vec<Attribute>,
    pub triggers: Vec<Trigger>,
    pub modifiers: AxisModifiers,
    /// Inclusive `(min, max)` quality degradation
    pub magnitude: (i32, i32),
    /// Whether the degradation still lands when the action succeeds
    pub applies_on_success: bool,
    pub rarity_weight: f64,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawFailingDef {
    pub id: DefId,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub affected_attributes: Vec<String>,
    #[serde(default = "super::default_triggers")]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, i32>,
    #[serde(default)]
    pub magnitude: (i32, i32),
    #[serde(default = "default_applies_on_success")]
    pub applies_on_success: bool,
    #[serde(default = "super::default_weight")]
    pub rarity_weight: f64,
    #[serde(default)]
    pub description: String,
}

fn default_applies_on_success() -> bool {
    true
}

impl RawFailingDef {
    pub fn validate(self) -> Validated<FailingDef> {
        let (min, max) = self.magnitude;
        if min < 0 || min > max {
            return Err(format!("invalid magnitude range ({}, {})", min, max));
        }
        check_bounded("magnitude", max)?;
        let affected_attributes = self
            .affected_attributes
            .iter()
            .map(|name| name.parse::<Attribute>().map_err(|e| e.to_string()))
            .collect::<Validated<Vec<_>>>()?;

        Ok(FailingDef {
            rarity_weight: check_weight(self.rarity_weight)?,
            triggers: parse_triggers(&self.triggers)?,
            modifiers: parse_modifiers(&self.modifiers)?,
            affected_attributes,
            id: self.id,
            severity: self.severity,
            magnitude: self.magnitude,
            applies_on_success: self.applies_on_success,
            description: self.description,
        })
    }
}

impl FailingDef {
    pub fn new(id: impl Into<DefId>, trigger: Trigger, modifiers: AxisModifiers) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Minor,
            affected_attributes: Vec::new(),
            triggers: vec![trigger],
            modifiers,
            magnitude: (0, 0),
            applies_on_success: true,
            rarity_weight: 1.0,
            description: String::new(),
        }
    }

    /// Degradation for a given character
    ///
    /// The weaker the affected attributes, the closer to the top of the
    /// magnitude range. With no affected attributes the midpoint is used.
    pub fn magnitude_for(&self, attributes: &AttributeSet) -> i32 {
        let (min, max) = self.magnitude;
        if max == min {
            return min;
        }
        if self.affected_attributes.is_empty() {
            return ((i64::from(min) + i64::from(max)) / 2) as i32;
        }
        let count = self.affected_attributes.len() as i64;
        let total: i64 = self
            .affected_attributes
            .iter()
            .map(|a| i64::from(attributes.get(*a)))
            .sum();
        let weakness = i64::from(ATTRIBUTE_MAX) * count - total;
        let span = i64::from(ATTRIBUTE_MAX - 1) * count;
        let scaled = i64::from(min) + (i64::from(max) - i64::from(min)) * weakness / span;
        scaled.clamp(i64::from(min), i64::from(max)) as i32
    }
}
