//! Trigger conditions and the context they are evaluated against

use crate::error::{Error, Result};
use crate::identity::DefId;
use crate::record::Outcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a modifier source participates in a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Always,
    /// Evaluated post-hoc, after the outcome is classified
    OnSuccess,
    /// Evaluated post-hoc, after the outcome is classified
    OnFailure,
    WhenObservedByNpc,
    WhenHighRisk,
    WhenUnarmed,
    WhenRushed,
}

impl Trigger {
    pub const ALL: [Trigger; 7] = [
        Trigger::Always,
        Trigger::OnSuccess,
        Trigger::OnFailure,
        Trigger::WhenObservedByNpc,
        Trigger::WhenHighRisk,
        Trigger::WhenUnarmed,
        Trigger::WhenRushed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Always => "always",
            Trigger::OnSuccess => "on_success",
            Trigger::OnFailure => "on_failure",
            Trigger::WhenObservedByNpc => "when_observed_by_npc",
            Trigger::WhenHighRisk => "when_high_risk",
            Trigger::WhenUnarmed => "when_unarmed",
            Trigger::WhenRushed => "when_rushed",
        }
    }

    /// Whether this trigger can only be decided once the outcome is known
    pub fn is_post_hoc(&self) -> bool {
        matches!(self, Trigger::OnSuccess | Trigger::OnFailure)
    }

    /// Evaluate a pre-outcome trigger against the action context
    ///
    /// Post-hoc triggers always return false here; see [`Trigger::matches_outcome`].
    pub fn matches(&self, ctx: &ActionContext) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::OnSuccess | Trigger::OnFailure => false,
            Trigger::WhenObservedByNpc => ctx.observed_by_npc,
            Trigger::WhenHighRisk => ctx.high_risk,
            Trigger::WhenUnarmed => ctx.unarmed,
            Trigger::WhenRushed => ctx.rushed,
        }
    }

    /// Evaluate a post-hoc trigger against the classified outcome
    ///
    /// A partial success counts as neither success nor failure.
    pub fn matches_outcome(&self, outcome: Outcome) -> bool {
        match self {
            Trigger::OnSuccess => outcome == Outcome::Success,
            Trigger::OnFailure => outcome == Outcome::Failure,
            _ => false,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Trigger::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownTrigger(s.to_string()))
    }
}

/// Everything a trigger may inspect about the action being resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub action: DefId,
    pub room_type: DefId,
    pub observed_by_npc: bool,
    pub high_risk: bool,
    pub unarmed: bool,
    pub rushed: bool,
}

impl ActionContext {
    /// A quiet context: nobody watching, nothing at stake
    pub fn new(action: impl Into<DefId>, room_type: impl Into<DefId>) -> Self {
        Self {
            action: action.into(),
            room_type: room_type.into(),
            observed_by_npc: false,
            high_risk: false,
            unarmed: false,
            rushed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_names() {
        for trigger in Trigger::ALL {
            assert_eq!(trigger.as_str().parse::<Trigger>().unwrap(), trigger);
        }
        assert!("when_full_moon".parse::<Trigger>().is_err());
    }

    #[test]
    fn test_context_triggers() {
        let mut ctx = ActionContext::new("fish", "river");
        assert!(Trigger::Always.matches(&ctx));
        assert!(!Trigger::WhenObservedByNpc.matches(&ctx));

        ctx.observed_by_npc = true;
        ctx.unarmed = true;
        assert!(Trigger::WhenObservedByNpc.matches(&ctx));
        assert!(Trigger::WhenUnarmed.matches(&ctx));
        assert!(!Trigger::WhenHighRisk.matches(&ctx));
    }

    #[test]
    fn test_post_hoc_triggers_wait_for_outcome() {
        let ctx = ActionContext::new("fish", "river");
        assert!(!Trigger::OnFailure.matches(&ctx));
        assert!(Trigger::OnFailure.matches_outcome(Outcome::Failure));
        assert!(!Trigger::OnFailure.matches_outcome(Outcome::PartialSuccess));
        assert!(Trigger::OnSuccess.matches_outcome(Outcome::Success));
        assert!(!Trigger::Always.matches_outcome(Outcome::Success));
    }
}
