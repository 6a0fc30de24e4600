// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character profiles and their resolution into appearance state.
//!
//! A profile is what a player authored: species, sex, colors, a hair and
//! facial-hair style, and a flat list of markings. Resolution turns it into a
//! [`MarkingSet`] in an order that lets coloring rules see what they depend
//! on:
//!
//! 1. Freely colored markings, in profile order.
//! 2. Hair and facial hair, as single-sprite markings. Their color follows the
//!    skin when the species skin-matches that layer.
//! 3. Markings with forced coloring, colored from rules that may read any
//!    marking added above.
//! 4. Species pruning and forced markings, then sex restrictions, then
//!    defaults for required categories.
//!
//! Markings the catalog does not know are dropped without aborting.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::appearance::{AppearanceState, Gender, Sex};
use crate::catalog::{Catalog, MarkingDef};
use crate::color::Color;
use crate::layer::HumanoidLayer;
use crate::marking::coloring::layer_colors;
use crate::marking::{Marking, MarkingCategory, MarkingSet};

/// Colors, styles, and markings chosen for a character.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterAppearance {
    /// Hair marking id.
    pub hair_style_id: String,
    /// Hair color, unless the species skin-matches hair.
    pub hair_color: Color,
    /// Facial hair marking id.
    pub facial_hair_style_id: String,
    /// Facial hair color, unless the species skin-matches facial hair.
    pub facial_hair_color: Color,
    /// Skin color.
    pub skin_color: Color,
    /// Eye color.
    pub eye_color: Color,
    /// Chosen markings in the order the player added them.
    pub markings: Vec<Marking>,
}

impl Default for CharacterAppearance {
    fn default() -> Self {
        Self {
            hair_style_id: String::new(),
            hair_color: Color::BLACK,
            facial_hair_style_id: String::new(),
            facial_hair_color: Color::BLACK,
            skin_color: Color::WHITE,
            eye_color: Color::BLACK,
            markings: Vec::new(),
        }
    }
}

/// A saved character.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterProfile {
    /// Species id.
    pub species: String,
    /// Sex.
    pub sex: Sex,
    /// Gender.
    pub gender: Gender,
    /// Age in years.
    pub age: u32,
    /// Height, stored as entered.
    pub height: f32,
    /// Appearance choices.
    pub appearance: CharacterAppearance,
}

impl CharacterProfile {
    /// Creates a profile for `species` with default choices.
    #[must_use]
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            sex: Sex::default(),
            gender: Gender::default(),
            age: 18,
            height: 1.0,
            appearance: CharacterAppearance::default(),
        }
    }

    /// Resolves the profile's markings into a set limited by the species'
    /// marking points.
    #[must_use]
    pub fn resolve_markings<C: Catalog + ?Sized>(&self, catalog: &C) -> MarkingSet {
        let appearance = &self.appearance;
        let skin = appearance.skin_color;
        let points = catalog
            .species(&self.species)
            .map(|species| species.marking_points.clone())
            .unwrap_or_else(BTreeMap::new);
        let mut markings = MarkingSet::new(points);

        let mut forced: Vec<(&Marking, &MarkingDef)> = Vec::new();
        for marking in &appearance.markings {
            let Some(def) = catalog.marking(&marking.id) else {
                continue;
            };
            if !def.forced_coloring {
                markings.add_back(def.category, marking.clone());
            } else if !forced.iter().any(|(m, _)| *m == marking) {
                forced.push((marking, def));
            }
        }

        for (layer, category, id, color) in [
            (
                HumanoidLayer::Hair,
                MarkingCategory::Hair,
                &appearance.hair_style_id,
                appearance.hair_color,
            ),
            (
                HumanoidLayer::FacialHair,
                MarkingCategory::FacialHair,
                &appearance.facial_hair_style_id,
                appearance.facial_hair_color,
            ),
        ] {
            let color = catalog
                .must_match_skin(&self.species, layer)
                .map_or(color, |alpha| skin.with_alpha(alpha));
            let marking = Marking::new(id.clone(), vec![color]);
            if catalog.can_be_applied(&self.species, self.sex, &marking) {
                markings.add_back(category, marking);
            }
        }

        for (marking, def) in forced {
            let colors = layer_colors(def, Some(skin), Some(appearance.eye_color), &markings);
            markings.add_back(def.category, Marking::new(marking.id.clone(), colors));
        }

        markings.ensure_species(&self.species, Some(skin), catalog);
        markings.ensure_sexes(self.sex, catalog);
        markings.ensure_default(Some(skin), Some(appearance.eye_color), catalog);
        markings
    }

    /// Overwrites `state` with this profile.
    ///
    /// Equipment hiding, permanent hiding, and custom base layers are reset.
    /// Render-side data is kept for the next composition pass to reconcile.
    pub fn apply_to<C: Catalog + ?Sized>(&self, state: &mut AppearanceState, catalog: &C) {
        state.markings = self.resolve_markings(catalog);
        state.permanently_hidden.clear();
        state.hidden_layers.clear();
        state.custom_base_layers.clear();
        state.sex = self.sex;
        state.gender = self.gender;
        state.age = self.age;
        state.species.clone_from(&self.species);
        state.skin_color = self.appearance.skin_color;
        state.eye_color = self.appearance.eye_color;
        state.height = self.height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::SlotFlags;
    use crate::test_support::{self, DARK, HUMAN, LIZARD, LIZARD_SKIN_ALPHA, RED, SKIN};

    fn ids(set: &MarkingSet, category: MarkingCategory) -> Vec<&str> {
        set.category(category).iter().map(|m| m.id.as_str()).collect()
    }

    fn human() -> CharacterProfile {
        let mut profile = CharacterProfile::new(HUMAN);
        profile.appearance.skin_color = SKIN;
        profile.appearance.eye_color = DARK;
        profile
    }

    #[test]
    fn forced_coloring_sees_markings_listed_after_it() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.markings = vec![
            Marking::new("StripeAccent", vec![Color::BLACK]),
            Marking::new("ChestTattoo", vec![RED]),
        ];
        let set = profile.resolve_markings(&catalog);
        assert_eq!(ids(&set, MarkingCategory::Chest), ["ChestTattoo", "StripeAccent"]);
        assert_eq!(set.category(MarkingCategory::Chest)[1].colors(), &[RED]);

        profile.appearance.markings.reverse();
        let set = profile.resolve_markings(&catalog);
        assert_eq!(set.category(MarkingCategory::Chest)[1].colors(), &[RED]);
    }

    #[test]
    fn forced_coloring_falls_back_without_dependency() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.markings = vec![Marking::new("StripeAccent", vec![Color::BLACK])];
        let set = profile.resolve_markings(&catalog);
        assert_eq!(set.category(MarkingCategory::Chest)[0].colors(), &[SKIN]);
    }

    #[test]
    fn unknown_markings_are_dropped() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.markings = vec![
            Marking::new("Missing", vec![RED]),
            Marking::new("ChestTattoo", vec![RED]),
        ];
        let set = profile.resolve_markings(&catalog);
        assert_eq!(ids(&set, MarkingCategory::Chest), ["ChestTattoo"]);
        assert!(set.iter().all(|(_, m)| m.id != "Missing"));
    }

    #[test]
    fn hair_uses_profile_color_unless_skin_matched() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.hair_style_id = String::from("Bob");
        profile.appearance.hair_color = RED;
        let set = profile.resolve_markings(&catalog);
        assert_eq!(set.category(MarkingCategory::Hair)[0].colors(), &[RED]);

        profile.species = String::from(LIZARD);
        let set = profile.resolve_markings(&catalog);
        assert_eq!(
            set.category(MarkingCategory::Hair)[0].colors(),
            &[SKIN.with_alpha(LIZARD_SKIN_ALPHA)]
        );
    }

    #[test]
    fn facial_hair_respects_sex() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.facial_hair_style_id = String::from("FullBeard");
        assert_eq!(
            ids(&profile.resolve_markings(&catalog), MarkingCategory::FacialHair),
            ["FullBeard"]
        );
        profile.sex = Sex::Female;
        assert!(
            profile
                .resolve_markings(&catalog)
                .category(MarkingCategory::FacialHair)
                .is_empty()
        );
    }

    #[test]
    fn species_rules_run_last() {
        let catalog = test_support::catalog();
        let set = human().resolve_markings(&catalog);
        assert_eq!(ids(&set, MarkingCategory::UndergarmentBottom), ["Briefs"]);

        let mut lizard = human();
        lizard.species = String::from(LIZARD);
        let set = lizard.resolve_markings(&catalog);
        assert_eq!(ids(&set, MarkingCategory::Tail), ["LizardTail"]);
        assert_eq!(set.category(MarkingCategory::Tail)[0].colors(), &[SKIN]);
    }

    #[test]
    fn capacity_limits_apply_to_profile_markings() {
        let catalog = test_support::catalog();
        let mut profile = human();
        profile.appearance.hair_style_id = String::from("Bob");
        profile.appearance.markings = vec![Marking::new("Bob", vec![DARK])];
        let set = profile.resolve_markings(&catalog);
        // The listed hair takes the only hair point.
        assert_eq!(set.category(MarkingCategory::Hair).len(), 1);
        assert_eq!(set.category(MarkingCategory::Hair)[0].colors(), &[DARK]);
    }

    #[test]
    fn resolves_through_a_trait_object() {
        let catalog: &dyn Catalog = &test_support::catalog();
        let mut profile = human();
        profile.species = String::from(LIZARD);
        profile.sex = Sex::Female;
        profile.appearance.facial_hair_style_id = String::from("FullBeard");

        let set = profile.resolve_markings(catalog);
        assert_eq!(ids(&set, MarkingCategory::Tail), ["LizardTail"]);
        assert!(set.category(MarkingCategory::FacialHair).is_empty());

        let mut state = AppearanceState::new(HUMAN);
        profile.apply_to(&mut state, catalog);
        assert_eq!(state.species, LIZARD);
        assert_eq!(state.markings, set);
    }

    #[test]
    fn apply_to_resets_hiding_and_overrides() {
        let catalog = test_support::catalog();
        let mut state = AppearanceState::new(LIZARD);
        state.permanently_hidden.insert(HumanoidLayer::Tail);
        state.hidden_layers.insert(HumanoidLayer::Hair, SlotFlags::HEAD);
        state
            .custom_base_layers
            .insert(HumanoidLayer::Head, crate::appearance::CustomBaseLayer::default());

        let mut profile = human();
        profile.height = 3.0;
        profile.sex = Sex::Female;
        profile.apply_to(&mut state, &catalog);

        assert_eq!(state.species, HUMAN);
        assert_eq!(state.sex, Sex::Female);
        assert_eq!(state.height, 3.0);
        assert_eq!(state.skin_color, SKIN);
        assert!(state.permanently_hidden.is_empty());
        assert!(state.hidden_layers.is_empty());
        assert!(state.custom_base_layers.is_empty());
        assert_eq!(ids(&state.markings, MarkingCategory::UndergarmentBottom), ["Briefs"]);
    }
}
