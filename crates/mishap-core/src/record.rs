//! Ledger records: the factual result of one resolved action

use crate::axis::ResolvedAxes;
use crate::identity::{CharacterId, DefId, ItemId, LedgerId, RoomId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an action turned out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    PartialSuccess,
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::PartialSuccess => "partial_success",
            Outcome::Failure => "failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the outcome should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    Avoidable,
    Inevitable,
    Fortunate,
}

impl Interpretation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::Avoidable => "avoidable",
            Interpretation::Inevitable => "inevitable",
            Interpretation::Fortunate => "fortunate",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the engine determined about one action, before it has a ledger id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub character: CharacterId,
    pub action: DefId,
    pub room: RoomId,
    /// Items as requested by the caller, including ones that were not usable
    pub items_used: Vec<ItemId>,
    /// True when the action's default/unarmed modifier set was substituted
    pub unarmed: bool,
    /// Caller marked the action as hurried
    #[serde(default)]
    pub rushed: bool,
    pub axes: ResolvedAxes,
    pub outcome: Outcome,
    /// Factor ids in the order they were applied
    pub contributing_factors: Vec<DefId>,
    pub interpretation: Interpretation,
    /// Share of factors that were character-controlled, in `[0, 1]`
    pub blame_weight: f64,
    /// Explicit seed supplied (or generated) for this call
    pub seed: String,
    /// Seed actually fed to the RNG
    pub derived_seed: u64,
    /// Earlier entry for the same inputs, when this is a retry
    #[serde(default)]
    pub supersedes: Option<LedgerId>,
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    /// True if both records describe the same deterministic resolution
    ///
    /// Ignores the wall-clock timestamp and retry linkage.
    pub fn same_resolution(&self, other: &ActionRecord) -> bool {
        self.character == other.character
            && self.action == other.action
            && self.room == other.room
            && self.items_used == other.items_used
            && self.unarmed == other.unarmed
            && self.rushed == other.rushed
            && self.axes == other.axes
            && self.outcome == other.outcome
            && self.contributing_factors == other.contributing_factors
            && self.interpretation == other.interpretation
            && self.blame_weight.to_bits() == other.blame_weight.to_bits()
            && self.derived_seed == other.derived_seed
    }
}

/// A committed, immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerId,
    pub record: ActionRecord,
}

impl LedgerEntry {
    pub fn new(id: LedgerId, record: ActionRecord) -> Self {
        Self { id, record }
    }

    pub fn character(&self) -> CharacterId {
        self.record.character
    }

    pub fn outcome(&self) -> Outcome {
        self.record.outcome
    }

    pub fn interpretation(&self) -> Interpretation {
        self.record.interpretation
    }

    pub fn blame_weight(&self) -> f64 {
        self.record.blame_weight
    }

    pub fn contributing_factors(&self) -> &[DefId] {
        &self.record.contributing_factors
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.record.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ActionRecord {
        ActionRecord {
            character: CharacterId(3),
            action: DefId::new("fish"),
            room: RoomId::new("river_bend"),
            items_used: vec![],
            unarmed: true,
            rushed: false,
            axes: ResolvedAxes::default(),
            outcome: Outcome::PartialSuccess,
            contributing_factors: vec![DefId::new("unarmed:fish")],
            interpretation: Interpretation::Inevitable,
            blame_weight: 0.0,
            seed: "seed_1".to_string(),
            derived_seed: 99,
            supersedes: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_same_resolution_ignores_timestamp_and_linkage() {
        let a = record();
        let mut b = a.clone();
        b.timestamp = a.timestamp + chrono::Duration::seconds(30);
        b.supersedes = Some(LedgerId::new(CharacterId(3), 1));
        assert!(a.same_resolution(&b));

        b.outcome = Outcome::Failure;
        assert!(!a.same_resolution(&b));
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let text = ron::to_string(&Outcome::PartialSuccess).unwrap();
        assert_eq!(text, "partial_success");
    }
}
