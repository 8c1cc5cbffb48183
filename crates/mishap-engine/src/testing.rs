//! Fixtures shared by the engine's tests

use chrono::Utc;
use mishap_content::{
    ActionDef, ContentLibrary, EnvironmentalQuirkDef, FailingDef, InteractionEffect, ItemQuirkDef,
    ItemTypeDef, Loader, QuirkDef, UselessBitDef,
};
use mishap_core::{
    Attribute, AttributeSet, Axis, AxisModifiers, Character, CharacterId, CharacterParts, DefId,
    Item, ItemId, MakerProfile, Reputation, Sex, Trigger,
};

/// A small library with one definition per behaviour under test
pub fn scenario_library() -> ContentLibrary {
    let mut loader = Loader::new().strict(true);

    loader
        .add_quirk(QuirkDef::new(
            "butterfingers",
            Trigger::Always,
            AxisModifiers::new().with(Axis::Precision, -1),
        ))
        .unwrap();
    loader
        .add_quirk(QuirkDef::new(
            "steady_hands",
            Trigger::Always,
            AxisModifiers::new().with(Axis::Precision, 1),
        ))
        .unwrap();
    loader
        .add_quirk(QuirkDef::new(
            "daydreamer",
            Trigger::Always,
            AxisModifiers::new().with(Axis::Interpretability, 1),
        ))
        .unwrap();
    loader
        .add_quirk(
            QuirkDef::new(
                "lucky_mishap",
                Trigger::OnFailure,
                AxisModifiers::new().with(Axis::Interpretability, 2),
            )
            .reinterpreting_failure(),
        )
        .unwrap();

    let mut early = FailingDef::new(
        "early_action",
        Trigger::Always,
        AxisModifiers::new().with(Axis::Timing, -2),
    );
    early.affected_attributes = vec![Attribute::Patience];
    early.magnitude = (1, 3);
    loader.add_failing(early).unwrap();

    loader
        .add_useless_bit(UselessBitDef {
            id: DefId::new("knot_trivia"),
            triggers: vec![Trigger::Always],
            bonus: AxisModifiers::new().with(Axis::Interpretability, 1),
            penalty: AxisModifiers::new().with(Axis::Timing, -1),
            rarity_weight: 1.0,
            description: String::new(),
        })
        .unwrap();

    loader
        .add_item_quirk(
            ItemQuirkDef::new("springy_rod", AxisModifiers::new().with(Axis::Timing, 1))
                .for_action("fish")
                .with_interaction("steady_hands", InteractionEffect::Amplify),
        )
        .unwrap();
    loader
        .add_item_type(ItemTypeDef {
            id: DefId::new("fishing_rod"),
            default_quirks: vec![DefId::new("springy_rod")],
            description: String::new(),
        })
        .unwrap();
    loader
        .add_item_type(ItemTypeDef {
            id: DefId::new("lantern"),
            default_quirks: Vec::new(),
            description: String::new(),
        })
        .unwrap();

    loader
        .add_environmental_quirk(
            EnvironmentalQuirkDef::new(
                "strong_current",
                AxisModifiers::new()
                    .with(Axis::Timing, 1)
                    .with(Axis::Stability, -1),
            )
            .in_room_type("river"),
        )
        .unwrap();

    let mut fish = ActionDef::new("fish");
    fish.item_types = vec![DefId::new("fishing_rod")];
    fish.unarmed_modifiers = AxisModifiers::new().with(Axis::RecoveryCost, 2);
    loader.add_action(fish).unwrap();

    // fails often: any timing or precision wobble, and a high stability floor
    let mut juggle = ActionDef::new("juggle");
    juggle.deviation_threshold = 0;
    juggle.stability_floor = 2;
    loader.add_action(juggle).unwrap();

    let (library, report) = loader.finish().unwrap();
    assert!(report.is_clean());
    library
}

/// A character with exactly the given traits and flat attributes
pub fn character(id: u64, quirks: &[&str], failings: &[&str], useless_bits: &[&str]) -> Character {
    let ids = |names: &[&str]| names.iter().map(|n| DefId::new(*n)).collect::<Vec<_>>();
    Character::new(CharacterParts {
        id: CharacterId(id),
        account_ref: format!("acct-{id}"),
        sex: Sex::Unspecified,
        attributes: AttributeSet::new([5; 7]).unwrap(),
        quirks: ids(quirks),
        failings: ids(failings),
        useless_bits: ids(useless_bits),
        reputation: Reputation::default(),
        issued_seed: format!("fixture-{id}"),
        created_at: Utc::now(),
    })
    .unwrap()
}

/// An item with the given quirks, made by nobody in particular
pub fn item(id: u64, item_type: &str, quirks: &[&str]) -> Item {
    let now = Utc::now();
    Item {
        id: ItemId(id),
        item_type: DefId::new(item_type),
        creator: CharacterId(0),
        maker_profile: MakerProfile {
            creator: CharacterId(0),
            attributes: AttributeSet::new([5; 7]).unwrap(),
            quirks: Vec::new(),
            captured_at: now,
        },
        quirks: quirks.iter().map(|q| DefId::new(*q)).collect(),
        created_at: now,
    }
}
