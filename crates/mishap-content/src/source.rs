//! The modifier source capability shared by every definition kind
//!
//! Resolution never cares whether a modifier came from a quirk, a failing,
//! a useless bit, an item or the room. It asks two questions of each source:
//! does it apply here, and what does it do to each axis.

use crate::schema::{EnvironmentalQuirkDef, FailingDef, ItemQuirkDef, QuirkDef, UselessBitDef};
use mishap_core::{ActionContext, AxisModifiers, DefId, Outcome, Trigger};
use serde::{Deserialize, Serialize};

/// Where a modifier came from, for blame attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Quirk,
    Failing,
    UselessBit,
    Item,
    Environment,
}

impl SourceOrigin {
    /// Quirks, failings and useless bits belong to the character
    pub fn is_character_controlled(&self) -> bool {
        matches!(
            self,
            SourceOrigin::Quirk | SourceOrigin::Failing | SourceOrigin::UselessBit
        )
    }
}

/// Something that conditionally contributes axis modifiers
pub trait ModifierSource {
    fn source_id(&self) -> &DefId;

    fn origin(&self) -> SourceOrigin;

    /// Whether the source applies before the outcome is known
    fn applicable(&self, ctx: &ActionContext) -> bool;

    /// Whether an outcome-gated source applies once the outcome is known
    fn applicable_after(&self, _outcome: Outcome) -> bool {
        false
    }

    fn axis_modifiers(&self) -> AxisModifiers;
}

fn any_matches(triggers: &[Trigger], ctx: &ActionContext) -> bool {
    triggers.iter().any(|t| t.matches(ctx))
}

fn any_matches_outcome(triggers: &[Trigger], outcome: Outcome) -> bool {
    triggers.iter().any(|t| t.matches_outcome(outcome))
}

impl ModifierSource for QuirkDef {
    fn source_id(&self) -> &DefId {
        &self.id
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Quirk
    }

    fn applicable(&self, ctx: &ActionContext) -> bool {
        any_matches(&self.triggers, ctx)
    }

    fn applicable_after(&self, outcome: Outcome) -> bool {
        any_matches_outcome(&self.triggers, outcome)
    }

    fn axis_modifiers(&self) -> AxisModifiers {
        self.modifiers.clone()
    }
}

impl ModifierSource for FailingDef {
    fn source_id(&self) -> &DefId {
        &self.id
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Failing
    }

    fn applicable(&self, ctx: &ActionContext) -> bool {
        any_matches(&self.triggers, ctx)
    }

    fn applicable_after(&self, outcome: Outcome) -> bool {
        any_matches_outcome(&self.triggers, outcome)
    }

    fn axis_modifiers(&self) -> AxisModifiers {
        self.modifiers.clone()
    }
}

impl ModifierSource for UselessBitDef {
    fn source_id(&self) -> &DefId {
        &self.id
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::UselessBit
    }

    fn applicable(&self, ctx: &ActionContext) -> bool {
        any_matches(&self.triggers, ctx)
    }

    fn applicable_after(&self, outcome: Outcome) -> bool {
        any_matches_outcome(&self.triggers, outcome)
    }

    fn axis_modifiers(&self) -> AxisModifiers {
        self.combined()
    }
}

impl ModifierSource for ItemQuirkDef {
    fn source_id(&self) -> &DefId {
        &self.id
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Item
    }

    fn applicable(&self, ctx: &ActionContext) -> bool {
        self.applies_to(&ctx.action)
    }

    fn axis_modifiers(&self) -> AxisModifiers {
        self.modifiers.clone()
    }
}

impl ModifierSource for EnvironmentalQuirkDef {
    fn source_id(&self) -> &DefId {
        &self.id
    }

    fn origin(&self) -> SourceOrigin {
        SourceOrigin::Environment
    }

    fn applicable(&self, ctx: &ActionContext) -> bool {
        let room_ok = self.room_types.is_empty() || self.room_types.contains(&ctx.room_type);
        let action_ok = self.action_types.is_empty() || self.action_types.contains(&ctx.action);
        room_ok && action_ok
    }

    fn axis_modifiers(&self) -> AxisModifiers {
        self.modifiers.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mishap_core::Axis;

    #[test]
    fn test_environment_filters_room_and_action() {
        let current = EnvironmentalQuirkDef::new(
            "strong_current",
            AxisModifiers::new().with(Axis::Timing, 1).with(Axis::Stability, -1),
        )
        .in_room_type("river");

        assert!(current.applicable(&ActionContext::new("fish", "river")));
        assert!(!current.applicable(&ActionContext::new("fish", "library")));
        assert_eq!(current.origin(), SourceOrigin::Environment);
    }

    #[test]
    fn test_quirk_on_failure_is_post_hoc() {
        let lucky = QuirkDef::new(
            "lucky_mishap",
            Trigger::OnFailure,
            AxisModifiers::new().with(Axis::Interpretability, 2),
        );
        let ctx = ActionContext::new("fish", "river");

        assert!(!lucky.applicable(&ctx));
        assert!(lucky.applicable_after(Outcome::Failure));
        assert!(!lucky.applicable_after(Outcome::Success));
    }

    #[test]
    fn test_origins_split_blame() {
        assert!(SourceOrigin::Quirk.is_character_controlled());
        assert!(SourceOrigin::Failing.is_character_controlled());
        assert!(SourceOrigin::UselessBit.is_character_controlled());
        assert!(!SourceOrigin::Item.is_character_controlled());
        assert!(!SourceOrigin::Environment.is_character_controlled());
    }
}
