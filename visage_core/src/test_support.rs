// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sample catalog shared by unit tests.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::appearance::Sex;
use crate::catalog::{BaseSpriteDef, MarkingDef, MemoryCatalog, SpeciesDef, SpriteSetDef};
use crate::color::Color;
use crate::layer::{HumanoidLayer, SpriteSpecifier};
use crate::marking::{
    ColoringKind, LayerColoring, MarkingCategory, MarkingColoring, MarkingPoints,
};

pub(crate) const HUMAN: &str = "Human";
pub(crate) const LIZARD: &str = "Lizard";

pub(crate) const SKIN: Color = Color::rgb(0.8, 0.6, 0.4);
pub(crate) const DARK: Color = Color::rgb(0.2, 0.1, 0.05);
pub(crate) const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub(crate) const LIZARD_SKIN_ALPHA: f32 = 0.9;

const ANY_MARKING: &str = "MobHumanoidAnyMarking";
const FOLLOW_SKIN: &str = "MobLizardAnyMarkingFollowSkin";

fn base(id: &str, rsi: &str, state: &str) -> BaseSpriteDef {
    BaseSpriteDef::new(id, Some(SpriteSpecifier::rsi(rsi, state)))
}

fn marking(
    id: &str,
    category: MarkingCategory,
    body_part: HumanoidLayer,
    rsi: &str,
    states: &[&str],
) -> MarkingDef {
    let sprites = states
        .iter()
        .map(|state| SpriteSpecifier::rsi(rsi, state))
        .collect();
    MarkingDef::new(id, category, body_part, sprites)
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| String::from(*s)).collect()
}

/// Builds a catalog with a human and a lizard species.
pub(crate) fn catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();

    // -- Base sprites --
    for (id, state) in [
        ("MobHumanTorso", "torso"),
        ("MobHumanTorsoMale", "torso_m"),
        ("MobHumanTorsoFemale", "torso_f"),
        ("MobHumanHead", "head"),
        ("MobHumanHeadMale", "head_m"),
        ("MobHumanHeadFemale", "head_f"),
        ("MobHumanLArm", "l_arm"),
    ] {
        catalog.insert_base_sprite(base(id, "mobs/species/human/parts.rsi", state));
    }
    for (id, state) in [("MobLizardTorso", "torso"), ("MobLizardHead", "head")] {
        catalog.insert_base_sprite(base(id, "mobs/species/lizard/parts.rsi", state));
    }
    let mut eyes = base("MobHumanoidEyes", "mobs/customization/eyes.rsi", "eyes");
    eyes.match_skin = false;
    eyes.allows_markings = false;
    catalog.insert_base_sprite(eyes);

    let mut any = BaseSpriteDef::new(ANY_MARKING, None);
    any.match_skin = false;
    catalog.insert_base_sprite(any);

    let mut follow = BaseSpriteDef::new(FOLLOW_SKIN, None);
    follow.layer_alpha = LIZARD_SKIN_ALPHA;
    follow.markings_match_skin = true;
    catalog.insert_base_sprite(follow);

    // -- Sprite sets --
    catalog.insert_sprite_set(SpriteSetDef {
        id: String::from(HUMAN),
        sprites: vec![
            (HumanoidLayer::Chest, String::from("MobHumanTorso")),
            (HumanoidLayer::Head, String::from("MobHumanHead")),
            (HumanoidLayer::Eyes, String::from("MobHumanoidEyes")),
            (HumanoidLayer::LArm, String::from("MobHumanLArm")),
            (HumanoidLayer::UndergarmentBottom, String::from(ANY_MARKING)),
            (HumanoidLayer::UndergarmentTop, String::from(ANY_MARKING)),
            (HumanoidLayer::FacialHair, String::from(ANY_MARKING)),
            (HumanoidLayer::Hair, String::from(ANY_MARKING)),
        ],
    });
    catalog.insert_sprite_set(SpriteSetDef {
        id: String::from(LIZARD),
        sprites: vec![
            (HumanoidLayer::Tail, String::from(ANY_MARKING)),
            (HumanoidLayer::Chest, String::from("MobLizardTorso")),
            (HumanoidLayer::Head, String::from("MobLizardHead")),
            (HumanoidLayer::HeadTop, String::from(FOLLOW_SKIN)),
            (HumanoidLayer::Eyes, String::from("MobHumanoidEyes")),
            (HumanoidLayer::UndergarmentBottom, String::from(ANY_MARKING)),
            (HumanoidLayer::UndergarmentTop, String::from(ANY_MARKING)),
            (HumanoidLayer::FacialHair, String::from(FOLLOW_SKIN)),
            (HumanoidLayer::Hair, String::from(FOLLOW_SKIN)),
        ],
    });

    // -- Species --
    let mut human = SpeciesDef::new(HUMAN, HUMAN);
    human.min_height = 0.8;
    human.max_height = 1.2;
    human.marking_points = BTreeMap::from([
        (MarkingCategory::Hair, MarkingPoints::limit(1)),
        (MarkingCategory::FacialHair, MarkingPoints::limit(1)),
        (MarkingCategory::Chest, MarkingPoints::limit(2)),
        (MarkingCategory::UndergarmentTop, MarkingPoints::limit(1)),
        (
            MarkingCategory::UndergarmentBottom,
            MarkingPoints::required(1, ids(&["Briefs"])),
        ),
    ]);
    catalog.insert_species(human);

    let mut lizard = SpeciesDef::new(LIZARD, LIZARD);
    lizard.min_height = 0.9;
    lizard.max_height = 1.3;
    lizard.base_scale = Vec2::new(1.1, 1.0);
    lizard.scale_height = true;
    lizard.forced_markings = ids(&["LizardTail"]);
    lizard.marking_points = BTreeMap::from([
        (MarkingCategory::Tail, MarkingPoints::limit(1)),
        (MarkingCategory::HeadTop, MarkingPoints::limit(1)),
        (MarkingCategory::Hair, MarkingPoints::limit(1)),
    ]);
    catalog.insert_species(lizard);

    // -- Markings --
    catalog.insert_marking(marking(
        "Bob",
        MarkingCategory::Hair,
        HumanoidLayer::Hair,
        "mobs/customization/hair.rsi",
        &["bob"],
    ));
    let mut beard = marking(
        "FullBeard",
        MarkingCategory::FacialHair,
        HumanoidLayer::FacialHair,
        "mobs/customization/facial_hair.rsi",
        &["full"],
    );
    beard.sex_restriction = Some(Sex::Male);
    catalog.insert_marking(beard);
    catalog.insert_marking(marking(
        "ChestTattoo",
        MarkingCategory::Chest,
        HumanoidLayer::Chest,
        "mobs/customization/tattoos.rsi",
        &["chest"],
    ));
    let mut accent = marking(
        "StripeAccent",
        MarkingCategory::Chest,
        HumanoidLayer::Chest,
        "mobs/customization/tattoos.rsi",
        &["stripes"],
    );
    accent.forced_coloring = true;
    accent.coloring = MarkingColoring::uniform(
        LayerColoring::new(ColoringKind::Marking(String::from("ChestTattoo")))
            .or(ColoringKind::Skin),
    );
    catalog.insert_marking(accent);
    catalog.insert_marking(marking(
        "TribalArm",
        MarkingCategory::Arms,
        HumanoidLayer::LArm,
        "mobs/customization/tribal.rsi",
        &["upper", "lower", "hand"],
    ));

    let mut tail = marking(
        "LizardTail",
        MarkingCategory::Tail,
        HumanoidLayer::Tail,
        "mobs/customization/reptilian.rsi",
        &["tail_smooth"],
    );
    tail.species_restrictions = Some(ids(&[LIZARD]));
    tail.forced_coloring = true;
    catalog.insert_marking(tail);
    let mut horns = marking(
        "LizardHorns",
        MarkingCategory::HeadTop,
        HumanoidLayer::HeadTop,
        "mobs/customization/reptilian.rsi",
        &["horns_curled"],
    );
    horns.species_restrictions = Some(ids(&[LIZARD]));
    catalog.insert_marking(horns);

    for (id, category, layer, state) in [
        (
            "Briefs",
            MarkingCategory::UndergarmentBottom,
            HumanoidLayer::UndergarmentBottom,
            "briefs",
        ),
        (
            "Boxers",
            MarkingCategory::UndergarmentBottom,
            HumanoidLayer::UndergarmentBottom,
            "boxers",
        ),
        (
            "Bra",
            MarkingCategory::UndergarmentTop,
            HumanoidLayer::UndergarmentTop,
            "bra",
        ),
    ] {
        let mut def = marking(id, category, layer, "mobs/customization/undergarments.rsi", &[state]);
        def.coloring = MarkingColoring::uniform(LayerColoring::new(ColoringKind::Fixed(Color::WHITE)));
        catalog.insert_marking(def);
    }

    catalog
}
