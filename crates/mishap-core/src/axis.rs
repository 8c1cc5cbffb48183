//! Resolution axes and per-axis modifier maps

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the six independent dimensions along which an action unfolds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Timing,
    Precision,
    Stability,
    Visibility,
    Interpretability,
    RecoveryCost,
}

impl Axis {
    /// All axes, in deviation draw order
    pub const ALL: [Axis; 6] = [
        Axis::Timing,
        Axis::Precision,
        Axis::Stability,
        Axis::Visibility,
        Axis::Interpretability,
        Axis::RecoveryCost,
    ];

    /// Stable snake_case name used in content files and exports
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Timing => "timing",
            Axis::Precision => "precision",
            Axis::Stability => "stability",
            Axis::Visibility => "visibility",
            Axis::Interpretability => "interpretability",
            Axis::RecoveryCost => "recovery_cost",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Axis::ALL
            .into_iter()
            .find(|axis| axis.as_str() == s)
            .ok_or_else(|| Error::UnknownAxis(s.to_string()))
    }
}

/// Integer modifiers keyed by axis; absent axes count as zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisModifiers(BTreeMap<Axis, i32>);

impl AxisModifiers {
    /// Create an empty (neutral) modifier set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single axis setter
    pub fn with(mut self, axis: Axis, value: i32) -> Self {
        self.add(axis, value);
        self
    }

    /// Parse raw `name -> value` pairs, rejecting unknown axis names
    pub fn parse<'a>(raw: impl IntoIterator<Item = (&'a str, i32)>) -> Result<Self> {
        let mut modifiers = Self::new();
        for (name, value) in raw {
            modifiers.add(name.parse()?, value);
        }
        Ok(modifiers)
    }

    /// Modifier on one axis
    pub fn get(&self, axis: Axis) -> i32 {
        self.0.get(&axis).copied().unwrap_or(0)
    }

    /// Add to one axis, saturating at the `i32` bounds
    pub fn add(&mut self, axis: Axis, value: i32) {
        let slot = self.0.entry(axis).or_insert(0);
        *slot = slot.saturating_add(value);
    }

    /// Stack another modifier set on top of this one
    pub fn merge(&mut self, other: &AxisModifiers) {
        for (axis, value) in other.iter() {
            self.add(axis, value);
        }
    }

    /// Return a copy with every value transformed
    pub fn map_values(&self, f: impl Fn(i32) -> i32) -> AxisModifiers {
        Self(self.0.iter().map(|(axis, value)| (*axis, f(*value))).collect())
    }

    /// Iterate over explicitly set axes
    pub fn iter(&self) -> impl Iterator<Item = (Axis, i32)> + '_ {
        self.0.iter().map(|(axis, value)| (*axis, *value))
    }

    /// Sum across all axes
    pub fn net(&self) -> i32 {
        self.0.values().fold(0i32, |acc, v| acc.saturating_add(*v))
    }

    /// True when no axis carries a non-zero modifier
    pub fn is_neutral(&self) -> bool {
        self.0.values().all(|v| *v == 0)
    }
}

/// A single resolved axis value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAxis {
    /// Deterministic sum of all contributing sources
    pub base_modifier: i32,
    /// Seeded pseudo-random offset
    pub deviation: i32,
    /// `base_modifier + deviation`
    pub final_value: i32,
}

impl ResolvedAxis {
    pub fn new(base_modifier: i32, deviation: i32) -> Self {
        Self {
            base_modifier,
            deviation,
            final_value: base_modifier.saturating_add(deviation),
        }
    }
}

/// All six resolved axes of one action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAxes {
    pub timing: ResolvedAxis,
    pub precision: ResolvedAxis,
    pub stability: ResolvedAxis,
    pub visibility: ResolvedAxis,
    pub interpretability: ResolvedAxis,
    pub recovery_cost: ResolvedAxis,
}

impl ResolvedAxes {
    /// Resolve every axis from base modifiers and per-axis deviations
    pub fn resolve(base: &AxisModifiers, deviation: impl Fn(Axis) -> i32) -> Self {
        let mut axes = Self::default();
        for axis in Axis::ALL {
            *axes.get_mut(axis) = ResolvedAxis::new(base.get(axis), deviation(axis));
        }
        axes
    }

    pub fn get(&self, axis: Axis) -> ResolvedAxis {
        match axis {
            Axis::Timing => self.timing,
            Axis::Precision => self.precision,
            Axis::Stability => self.stability,
            Axis::Visibility => self.visibility,
            Axis::Interpretability => self.interpretability,
            Axis::RecoveryCost => self.recovery_cost,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut ResolvedAxis {
        match axis {
            Axis::Timing => &mut self.timing,
            Axis::Precision => &mut self.precision,
            Axis::Stability => &mut self.stability,
            Axis::Visibility => &mut self.visibility,
            Axis::Interpretability => &mut self.interpretability,
            Axis::RecoveryCost => &mut self.recovery_cost,
        }
    }

    /// Shift an axis' base modifier after classification, keeping the deviation
    pub fn shift_base(&mut self, axis: Axis, delta: i32) {
        let slot = self.get_mut(axis);
        *slot = ResolvedAxis::new(slot.base_modifier.saturating_add(delta), slot.deviation);
    }
}
