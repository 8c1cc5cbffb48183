//! Axis-based action resolution
//!
//! Resolution is a pure function: given the same character, items, room,
//! action and seed it always produces the same record. Steps:
//!
//! 1. Gather every applicable modifier source, in a fixed order: character
//!    quirks, failings, useless bits, item quirks (per item, request order),
//!    environmental quirks, then the unarmed fallback.
//! 2. Add item/character quirk interactions.
//! 3. Sum the sources into a base modifier per axis.
//! 4. Draw a deviation per axis from the derived seed.
//! 5. Classify, then apply outcome-gated sources and failing degradation.
//! 6. Attribute blame and pick an interpretation.

use crate::registry::Room;
use chrono::{DateTime, Utc};
use mishap_content::{
    ActionDef, ContentLibrary, FailingDef, ItemQuirkDef, ModifierSource, QuirkDef, SourceOrigin,
};
use mishap_core::{
    derive_seed, ActionContext, ActionRecord, Axis, AxisModifiers, Character, DefId, GameRng,
    Interpretation, Item, ItemId, Outcome, ResolvedAxes,
};
use tracing::{debug, warn};

/// Everything one resolution reads
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    pub character: &'a Character,
    pub action: &'a ActionDef,
    pub room: &'a Room,
    /// Items as the caller named them; these feed the seed
    pub requested_items: &'a [ItemId],
    /// The subset of requested items the character actually holds
    pub possessed_items: &'a [Item],
    pub rushed: bool,
    pub seed: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Computes action records against a content library
pub struct Resolver<'a> {
    library: &'a ContentLibrary,
    avoidable_threshold: f64,
}

impl<'a> Resolver<'a> {
    pub fn new(library: &'a ContentLibrary, avoidable_threshold: f64) -> Self {
        Self {
            library,
            avoidable_threshold,
        }
    }

    /// Resolve one action into an uncommitted record
    pub fn compute(&self, input: &Resolution<'_>) -> ActionRecord {
        let library = self.library;
        let character = input.character;
        let action = input.action;

        let unarmed = is_unarmed(action, input.possessed_items);
        let ctx = ActionContext {
            action: action.id.clone(),
            room_type: input.room.room_type.clone(),
            observed_by_npc: input.room.npc_present,
            high_risk: action.high_risk,
            unarmed,
            rushed: input.rushed,
        };

        let quirks = lookup(character.quirks(), "quirk", |id| library.quirk(id));
        let failings = lookup(character.failings(), "failing", |id| library.failing(id));
        let useless_bits = lookup(character.useless_bits(), "useless bit", |id| {
            library.useless_bit(id)
        });

        let mut tally = Tally::default();
        let mut held_back: Vec<&dyn ModifierSource> = Vec::new();

        let character_sources = quirks
            .iter()
            .map(|q| *q as &dyn ModifierSource)
            .chain(failings.iter().map(|f| *f as &dyn ModifierSource))
            .chain(useless_bits.iter().map(|b| *b as &dyn ModifierSource));
        for source in character_sources {
            if source.applicable(&ctx) {
                tally.include(source);
            } else {
                held_back.push(source);
            }
        }

        let mut item_quirks: Vec<&ItemQuirkDef> = Vec::new();
        for item in input.possessed_items {
            for id in &item.quirks {
                match library.item_quirk(id) {
                    Some(def) if def.applicable(&ctx) => {
                        tally.include(def);
                        item_quirks.push(def);
                    }
                    Some(_) => {}
                    None => warn!(item = %item.id, quirk = %id, "unknown item quirk skipped"),
                }
            }
        }

        for id in &input.room.environmental_quirks {
            match library.environmental_quirk(id) {
                Some(def) if def.applicable(&ctx) => tally.include(def),
                Some(_) => {}
                None => warn!(room = %input.room.id, quirk = %id, "unknown environmental quirk skipped"),
            }
        }

        if unarmed && !action.unarmed_modifiers.is_neutral() {
            tally.add(
                DefId::new(format!("unarmed:{}", action.id)),
                SourceOrigin::Item,
                &action.unarmed_modifiers,
            );
        }

        self.interactions(&item_quirks, &quirks, &mut tally);

        let derived_seed = derive_seed(
            character.id(),
            &action.id,
            &input.room.id,
            input.requested_items,
            input.seed,
        );
        let mut axes = ResolvedAxes::resolve(
            &tally.base,
            deviation_draws(derived_seed, action.deviation_spread),
        );

        let outcome = classify(&axes, action);

        for source in held_back {
            if source.applicable_after(outcome) {
                for (axis, value) in source.axis_modifiers().iter() {
                    axes.shift_base(axis, value);
                }
                tally.note(source.source_id().clone(), source.origin());
            }
        }

        if outcome != Outcome::Failure {
            degrade(&failings, character, &tally, &mut axes);
        }

        let blame_weight = tally.blame();
        let reinterpreted = outcome == Outcome::Failure
            && quirks
                .iter()
                .any(|q| q.reinterprets_failure && tally.contains(&q.id));
        let interpretation = if reinterpreted {
            Interpretation::Fortunate
        } else if blame_weight >= self.avoidable_threshold {
            Interpretation::Avoidable
        } else {
            Interpretation::Inevitable
        };

        debug!(
            character = %character.id(),
            action = %action.id,
            %outcome,
            %interpretation,
            blame_weight,
            factors = tally.factors.len(),
            "resolved action"
        );

        ActionRecord {
            character: character.id(),
            action: action.id.clone(),
            room: input.room.id.clone(),
            items_used: input.requested_items.to_vec(),
            unarmed,
            rushed: input.rushed,
            axes,
            outcome,
            contributing_factors: tally.ids(),
            interpretation,
            blame_weight,
            seed: input.seed.to_string(),
            derived_seed,
            supersedes: None,
            timestamp: input.timestamp,
        }
    }

    /// Pairings between included item quirks and included character quirks
    fn interactions(&self, item_quirks: &[&ItemQuirkDef], quirks: &[&QuirkDef], tally: &mut Tally) {
        for item_quirk in item_quirks {
            for (quirk_id, interaction) in &item_quirk.interactions {
                let Some(quirk) = quirks
                    .iter()
                    .find(|q| &q.id == quirk_id && tally.contains(&q.id))
                else {
                    continue;
                };
                tally.add(
                    DefId::new(format!("{}×{}", item_quirk.id, quirk.id)),
                    SourceOrigin::Item,
                    &interaction.effect.apply(&quirk.modifiers),
                );
            }
        }
    }
}

/// True when no usable item backs the action
///
/// For actions that expect items, only an item of an expected type counts.
fn is_unarmed(action: &ActionDef, possessed: &[Item]) -> bool {
    if action.expects_items() {
        !possessed
            .iter()
            .any(|item| action.item_types.contains(&item.item_type))
    } else {
        possessed.is_empty()
    }
}

/// Per-axis deviations drawn in `Axis::ALL` order
fn deviation_draws(derived_seed: u64, spread: i32) -> impl Fn(Axis) -> i32 {
    let spread = spread.max(0);
    let mut rng = GameRng::new(derived_seed);
    let mut draws = AxisModifiers::new();
    for axis in Axis::ALL {
        draws.add(axis, rng.range_i32(-spread, spread));
    }
    move |axis| draws.get(axis)
}

fn classify(axes: &ResolvedAxes, action: &ActionDef) -> Outcome {
    let threshold = action.deviation_threshold;
    let off_course = axes.timing.deviation.abs() > threshold
        || axes.precision.deviation.abs() > threshold;

    if !off_course {
        Outcome::Success
    } else if axes.stability.final_value < action.stability_floor {
        Outcome::Failure
    } else {
        Outcome::PartialSuccess
    }
}

/// Failings still cost something when things go right
fn degrade(failings: &[&FailingDef], character: &Character, tally: &Tally, axes: &mut ResolvedAxes) {
    for failing in failings {
        if !failing.applies_on_success || !tally.contains(&failing.id) {
            continue;
        }
        let magnitude = failing.magnitude_for(character.attributes());
        if magnitude != 0 {
            axes.shift_base(Axis::RecoveryCost, magnitude);
        }
    }
}

fn lookup<'l, T>(
    ids: &[DefId],
    kind: &'static str,
    find: impl Fn(&DefId) -> Option<&'l T>,
) -> Vec<&'l T> {
    ids.iter()
        .filter_map(|id| {
            let def = find(id);
            if def.is_none() {
                warn!(kind, id = %id, "character references unknown definition, skipped");
            }
            def
        })
        .collect()
}

/// Running base modifiers and the factors behind them
#[derive(Debug, Default)]
struct Tally {
    base: AxisModifiers,
    factors: Vec<(DefId, SourceOrigin)>,
}

impl Tally {
    fn include<S: ModifierSource + ?Sized>(&mut self, source: &S) {
        self.add(
            source.source_id().clone(),
            source.origin(),
            &source.axis_modifiers(),
        );
    }

    fn add(&mut self, id: DefId, origin: SourceOrigin, modifiers: &AxisModifiers) {
        self.base.merge(modifiers);
        self.note(id, origin);
    }

    /// Record a factor once, in first-applied order
    fn note(&mut self, id: DefId, origin: SourceOrigin) {
        if !self.contains(&id) {
            self.factors.push((id, origin));
        }
    }

    fn contains(&self, id: &DefId) -> bool {
        self.factors.iter().any(|(f, _)| f == id)
    }

    /// Share of factors the character controls
    fn blame(&self) -> f64 {
        if self.factors.is_empty() {
            return 0.0;
        }
        let controlled = self
            .factors
            .iter()
            .filter(|(_, origin)| origin.is_character_controlled())
            .count();
        (controlled as f64 / self.factors.len() as f64).clamp(0.0, 1.0)
    }

    fn ids(&self) -> Vec<DefId> {
        self.factors.iter().map(|(id, _)| id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{character, item, scenario_library};
    use mishap_core::Trigger;

    fn resolve_with(
        library: &ContentLibrary,
        character: &Character,
        action: &str,
        room: &Room,
        items: &[Item],
        seed: &str,
    ) -> ActionRecord {
        let action = library.action(&DefId::new(action)).unwrap();
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        Resolver::new(library, 0.5).compute(&Resolution {
            character,
            action,
            room,
            requested_items: &ids,
            possessed_items: items,
            rushed: false,
            seed,
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn test_quirk_sets_base_and_replay_is_identical() {
        let library = scenario_library();
        let clumsy = character(1, &["butterfingers", "daydreamer"], &[], &["knot_trivia"]);
        let room = Room::new("pond", "meadow");

        let first = resolve_with(&library, &clumsy, "fish", &room, &[], "seed_1");
        let second = resolve_with(&library, &clumsy, "fish", &room, &[], "seed_1");

        assert_eq!(first.axes.precision.base_modifier, -1);
        assert_eq!(first.axes.precision.final_value, second.axes.precision.final_value);
        assert_eq!(first.outcome, second.outcome);
        assert!(first.same_resolution(&second));
        assert!(first.unarmed);
    }

    #[test]
    fn test_item_and_failing_sum_on_timing() {
        let library = scenario_library();
        let eager = character(2, &["daydreamer", "steady_hands"], &["early_action"], &["knot_trivia"]);
        let rod = item(10, "fishing_rod", &["springy_rod"]);
        let room = Room::new("pond", "meadow");

        let record = resolve_with(&library, &eager, "fish", &room, &[rod], "seed_2");

        // springy_rod +1, early_action -2, knot_trivia -1
        assert_eq!(record.axes.timing.base_modifier, 1 - 2 - 1);
        assert!(!record.unarmed);
        let factors: Vec<&str> = record.contributing_factors.iter().map(|f| f.as_str()).collect();
        assert!(factors.contains(&"springy_rod"));
        assert!(factors.contains(&"early_action"));
    }

    #[test]
    fn test_environment_stacks_additively() {
        let library = scenario_library();
        let eager = character(3, &["daydreamer", "steady_hands"], &["early_action"], &["knot_trivia"]);
        let rod = item(11, "fishing_rod", &["springy_rod"]);

        let dry = resolve_with(&library, &eager, "fish", &Room::new("pond", "meadow"), &[rod.clone()], "s");
        let river = Room::new("bend", "river").with_quirk("strong_current");
        let wet = resolve_with(&library, &eager, "fish", &river, &[rod], "s");

        assert_eq!(wet.axes.timing.base_modifier, dry.axes.timing.base_modifier + 1);
        assert_eq!(
            wet.axes.stability.base_modifier,
            dry.axes.stability.base_modifier - 1
        );
        assert!(wet
            .contributing_factors
            .contains(&DefId::new("strong_current")));
    }

    #[test]
    fn test_lucky_mishap_reinterprets_failure() {
        let library = scenario_library();
        let room = Room::new("vault", "bank");
        let plain = character(4, &["butterfingers", "daydreamer"], &[], &["knot_trivia"]);
        let lucky = character(4, &["butterfingers", "lucky_mishap"], &[], &["knot_trivia"]);

        let seed = (0..200)
            .map(|n| format!("seed_{n}"))
            .find(|s| resolve_with(&library, &plain, "juggle", &room, &[], s).outcome == Outcome::Failure)
            .expect("some seed fails");

        let without = resolve_with(&library, &plain, "juggle", &room, &[], &seed);
        let with = resolve_with(&library, &lucky, "juggle", &room, &[], &seed);

        assert_eq!(without.interpretation, Interpretation::Avoidable);
        assert_eq!(with.outcome, Outcome::Failure);
        assert_eq!(with.interpretation, Interpretation::Fortunate);
        assert_eq!(
            with.axes.interpretability.base_modifier,
            without.axes.interpretability.base_modifier + 2 - 1
        );
        assert!(with.contributing_factors.contains(&DefId::new("lucky_mishap")));
    }

    #[test]
    fn test_blame_is_share_of_character_factors() {
        let library = scenario_library();
        let eager = character(5, &["daydreamer", "steady_hands"], &["early_action"], &["knot_trivia"]);
        let rod = item(12, "fishing_rod", &["springy_rod"]);
        let river = Room::new("bend", "river").with_quirk("strong_current");

        let record = resolve_with(&library, &eager, "fish", &river, &[rod], "seed_5");
        let controlled = ["daydreamer", "steady_hands", "early_action", "knot_trivia"]
            .iter()
            .filter(|id| record.contributing_factors.contains(&DefId::new(**id)))
            .count();

        assert!((0.0..=1.0).contains(&record.blame_weight));
        let expected = controlled as f64 / record.contributing_factors.len() as f64;
        assert!((record.blame_weight - expected).abs() < 1e-9);
    }

    #[test]
    fn test_amplify_interaction_is_its_own_factor() {
        let library = scenario_library();
        let steady = character(6, &["steady_hands", "daydreamer"], &[], &["knot_trivia"]);
        let rod = item(13, "fishing_rod", &["springy_rod"]);

        let record = resolve_with(&library, &steady, "fish", &Room::new("pond", "meadow"), &[rod], "s");

        // steady_hands +1, amplified once more by the rod
        assert_eq!(record.axes.precision.base_modifier, 2);
        assert!(record
            .contributing_factors
            .contains(&DefId::new("springy_rod×steady_hands")));
    }

    #[test]
    fn test_item_of_wrong_type_leaves_action_unarmed() {
        let library = scenario_library();
        let clumsy = character(7, &["butterfingers", "daydreamer"], &[], &["knot_trivia"]);
        let lantern = item(14, "lantern", &[]);

        let record = resolve_with(&library, &clumsy, "fish", &Room::new("pond", "meadow"), &[lantern], "s");
        assert!(record.unarmed);
        assert!(record.contributing_factors.contains(&DefId::new("unarmed:fish")));
        assert_eq!(record.axes.recovery_cost.base_modifier, 2);
    }

    #[test]
    fn test_deviations_stay_within_spread() {
        let library = scenario_library();
        let clumsy = character(8, &["butterfingers", "daydreamer"], &[], &["knot_trivia"]);
        let room = Room::new("pond", "meadow");
        let spread = library.action(&DefId::new("fish")).unwrap().deviation_spread;

        for n in 0..100 {
            let record = resolve_with(&library, &clumsy, "fish", &room, &[], &format!("s{n}"));
            for axis in Axis::ALL {
                assert!(record.axes.get(axis).deviation.abs() <= spread);
            }
        }
    }

    #[test]
    fn test_extreme_content_resolves_without_overflow() {
        use mishap_content::{FailingDef, Loader, QuirkDef, UselessBitDef};
        use mishap_core::Attribute;

        let mut loader = Loader::new();
        for id in ["titanic", "colossal"] {
            loader
                .add_quirk(QuirkDef::new(
                    id,
                    Trigger::Always,
                    AxisModifiers::new()
                        .with(Axis::Precision, i32::MAX)
                        .with(Axis::Stability, i32::MIN),
                ))
                .unwrap();
        }
        let mut crushing = FailingDef::new("crushing", Trigger::Always, AxisModifiers::new());
        crushing.magnitude = (0, i32::MAX);
        crushing.affected_attributes = vec![Attribute::Patience];
        loader.add_failing(crushing).unwrap();
        loader
            .add_useless_bit(UselessBitDef {
                id: DefId::new("trivia"),
                triggers: vec![Trigger::Always],
                bonus: AxisModifiers::new().with(Axis::RecoveryCost, i32::MAX),
                penalty: AxisModifiers::new(),
                rarity_weight: 1.0,
                description: String::new(),
            })
            .unwrap();
        let mut wild = ActionDef::new("wild");
        wild.deviation_spread = i32::MAX;
        wild.deviation_threshold = i32::MAX;
        loader.add_action(wild).unwrap();
        let (library, _) = loader.finish().unwrap();

        let giant = character(9, &["titanic", "colossal"], &["crushing"], &["trivia"]);
        for n in 0..20 {
            let record = resolve_with(&library, &giant, "wild", &Room::new("hall", "keep"), &[], &format!("s{n}"));
            assert_eq!(record.axes.precision.base_modifier, i32::MAX);
            assert_eq!(record.axes.stability.base_modifier, i32::MIN);
            assert!((0.0..=1.0).contains(&record.blame_weight));
        }
    }

    #[test]
    fn test_classification_thresholds() {
        let mut action = ActionDef::new("balance");
        action.deviation_threshold = 1;
        action.stability_floor = 0;

        let calm = ResolvedAxes::resolve(&AxisModifiers::new(), |_| 1);
        assert_eq!(classify(&calm, &action), Outcome::Success);

        let shaky = ResolvedAxes::resolve(&AxisModifiers::new(), |axis| match axis {
            Axis::Timing => 2,
            Axis::Stability => -1,
            _ => 0,
        });
        assert_eq!(classify(&shaky, &action), Outcome::Failure);

        let steady = ResolvedAxes::resolve(
            &AxisModifiers::new().with(Axis::Stability, 3),
            |axis| if axis == Axis::Precision { -2 } else { 0 },
        );
        assert_eq!(classify(&steady, &action), Outcome::PartialSuccess);
    }

    #[test]
    fn test_post_hoc_success_source() {
        let mut tally = Tally::default();
        let tidy = QuirkDef::new(
            "tidy",
            Trigger::OnSuccess,
            AxisModifiers::new().with(Axis::RecoveryCost, -1),
        );
        assert!(!tidy.applicable(&ActionContext::new("fish", "river")));
        assert!(tidy.applicable_after(Outcome::Success));

        tally.note(tidy.id.clone(), tidy.origin());
        tally.note(tidy.id.clone(), tidy.origin());
        assert_eq!(tally.ids().len(), 1);
        assert_eq!(tally.blame(), 1.0);
    }
}
