// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives two humanoids through the appearance system with tracing enabled.
//!
//! Every composition pass is printed by a
//! [`PrettyPrintSink`](visage_debug::pretty::PrettyPrintSink) and recorded by a
//! [`JsonRecorder`](visage_debug::json::JsonRecorder), which is exported to
//! `trace.json` at the end.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;

use kurbo::Vec2;
use visage_core::appearance::{AppearanceState, SlotFlags};
use visage_core::catalog::{BaseSpriteDef, MarkingDef, MemoryCatalog, SpeciesDef, SpriteSetDef};
use visage_core::color::Color;
use visage_core::config::CLIENT_CENSOR_NUDITY;
use visage_core::layer::{HumanoidLayer, LayerKey, LayerStack, SpriteSpecifier};
use visage_core::marking::{Marking, MarkingCategory, MarkingPoints};
use visage_core::profile::CharacterProfile;
use visage_core::system::{AppearanceSystem, Authority};
use visage_core::trace::{
    MarkingAppliedEvent, PassBeginEvent, PassEndEvent, SkipEvent, TraceSink,
};

use visage_debug::json::JsonRecorder;
use visage_debug::pretty::PrettyPrintSink;

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Both {
    pretty: PrettyPrintSink,
    recorder: JsonRecorder,
}

impl TraceSink for Both {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.pretty.on_pass_begin(e);
        self.recorder.on_pass_begin(e);
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        self.pretty.on_pass_end(e);
        self.recorder.on_pass_end(e);
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.pretty.on_skip(e);
        self.recorder.on_skip(e);
    }

    fn on_marking_applied(&mut self, e: &MarkingAppliedEvent<'_>) {
        self.pretty.on_marking_applied(e);
        self.recorder.on_marking_applied(e);
    }
}

fn rsi(path: &str, state: &str) -> Option<SpriteSpecifier> {
    Some(SpriteSpecifier::rsi(path, state))
}

fn catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();

    // -- base sprites ------------------------------------------------------
    catalog
        .insert_base_sprite(BaseSpriteDef::new(
            "MobHumanTorso",
            rsi("mobs/species/human/parts.rsi", "torso_m"),
        ))
        .insert_base_sprite(BaseSpriteDef::new(
            "MobHumanHead",
            rsi("mobs/species/human/parts.rsi", "head_m"),
        ));
    let mut eyes = BaseSpriteDef::new(
        "MobHumanoidEyes",
        rsi("mobs/customization/eyes.rsi", "eyes"),
    );
    eyes.match_skin = false;
    eyes.allows_markings = false;
    catalog.insert_base_sprite(eyes);
    let mut any = BaseSpriteDef::new("MobHumanoidAnyMarking", None);
    any.match_skin = false;
    catalog.insert_base_sprite(any);

    // -- species -----------------------------------------------------------
    let layers = [
        (HumanoidLayer::Chest, "MobHumanTorso"),
        (HumanoidLayer::Head, "MobHumanHead"),
        (HumanoidLayer::Eyes, "MobHumanoidEyes"),
        (HumanoidLayer::UndergarmentBottom, "MobHumanoidAnyMarking"),
        (HumanoidLayer::UndergarmentTop, "MobHumanoidAnyMarking"),
        (HumanoidLayer::Hair, "MobHumanoidAnyMarking"),
    ];
    catalog.insert_sprite_set(SpriteSetDef {
        id: String::from("Human"),
        sprites: layers
            .iter()
            .map(|(layer, id)| (*layer, String::from(*id)))
            .collect(),
    });
    let mut human = SpeciesDef::new("Human", "Human");
    human.min_height = 0.8;
    human.max_height = 1.2;
    human.base_scale = Vec2::new(1.0, 1.0);
    human.marking_points = BTreeMap::from([
        (MarkingCategory::Hair, MarkingPoints::limit(1)),
        (MarkingCategory::Chest, MarkingPoints::limit(2)),
    ]);
    catalog.insert_species(human);

    // -- markings ----------------------------------------------------------
    for (id, category, layer, path, state) in [
        (
            "Bob",
            MarkingCategory::Hair,
            HumanoidLayer::Hair,
            "hair.rsi",
            "bob",
        ),
        (
            "ChestTattoo",
            MarkingCategory::Chest,
            HumanoidLayer::Chest,
            "tattoos.rsi",
            "chest",
        ),
        (
            "Bra",
            MarkingCategory::UndergarmentTop,
            HumanoidLayer::UndergarmentTop,
            "undergarments.rsi",
            "bra",
        ),
        (
            "Briefs",
            MarkingCategory::UndergarmentBottom,
            HumanoidLayer::UndergarmentBottom,
            "undergarments.rsi",
            "briefs",
        ),
    ] {
        let sprites = vec![SpriteSpecifier::rsi(&format!("mobs/customization/{path}"), state)];
        catalog.insert_marking(MarkingDef::new(id, category, layer, sprites));
    }

    catalog
}

fn main() {
    let sink = Both {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: JsonRecorder::new(),
    };
    let mut system = AppearanceSystem::with_sink(catalog(), sink);

    // -- a local character -------------------------------------------------
    let local = system.spawn(
        AppearanceState::new("Human"),
        LayerStack::new(),
        Authority::Client,
    );
    let mut profile = CharacterProfile::new("Human");
    profile.height = 1.5;
    profile.appearance.skin_color = Color::rgb(0.85, 0.65, 0.5);
    profile.appearance.hair_style_id = String::from("Bob");
    profile.appearance.hair_color = Color::rgb(0.3, 0.15, 0.05);
    profile.appearance.markings = vec![
        Marking::new("ChestTattoo", vec![Color::rgb(0.1, 0.2, 0.6)]),
        Marking::new("DragonTattoo", vec![]),
    ];
    system.load_profile(local, Some(&profile));

    // -- a replicated character --------------------------------------------
    let mut remote = AppearanceState::new("Human");
    remote.undergarment_top = Some(String::from("Bra"));
    remote.undergarment_bottom = Some(String::from("Briefs"));
    let remote = system.spawn(remote, LayerStack::new(), Authority::Server);

    // -- triggers ----------------------------------------------------------
    system.config_mut().set(CLIENT_CENSOR_NUDITY, true);
    system.poll_config();
    system.set_skin_color(local, Color::rgb(0.6, 0.45, 0.3));
    system.set_layer_visibility(local, HumanoidLayer::Hair, false, Some(SlotFlags::HEAD));
    system.set_layer_visibility(local, HumanoidLayer::Hair, true, Some(SlotFlags::HEAD));

    for id in [local, remote] {
        let changes = system.surface_mut(id).commit();
        println!(
            "{id:?}: {} layers, +{} -{} recolored={}",
            system.surface(id).len(),
            changes.added.len(),
            changes.removed.len(),
            changes.recolored.len(),
        );
        let stack = system.surface(id);
        if let Some(hair) = stack.handle(&LayerKey::Identifier(HumanoidLayer::Hair)) {
            println!(
                "  {:?}: {hair:?} visible={} color={:?}",
                stack.key_of(hair),
                stack.visible_of(hair),
                stack.color_of(hair),
            );
        }
    }

    // -- export JSON ---------------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    let recorder = &system.sink().recorder;
    recorder
        .export(&mut writer)
        .expect("failed to write JSON trace");

    println!(
        "Wrote {path} ({} events, {} passes)",
        recorder.len(),
        system.passes()
    );
}
