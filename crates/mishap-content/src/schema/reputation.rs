//! Reputation bias table rows

use mishap_core::{DefId, Reputation};
use serde::{Deserialize, Serialize};

/// One starting reputation a new character may be issued with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationBias {
    pub id: DefId,
    #[serde(default = "super::default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub notes: String,
}

impl ReputationBias {
    pub fn to_reputation(&self) -> Reputation {
        Reputation::new(self.score, self.notes.clone())
    }
}
