// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only definitions for species, sprites, and markings.
//!
//! Definitions are authored and validated elsewhere; core only looks them up
//! by id. Every lookup may fail, and composition treats a missing definition
//! as "skip this piece", never as an error.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::appearance::Sex;
use crate::layer::{HumanoidLayer, SpriteSpecifier};
use crate::marking::{Marking, MarkingCategory, MarkingColoring, MarkingPoints};

/// A species: its sprite set, marking limits, and size.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesDef {
    /// Species id.
    pub id: String,
    /// Id of the [`SpriteSetDef`] providing base sprites.
    pub sprite_set: String,
    /// Per-category marking limits and defaults.
    pub marking_points: BTreeMap<MarkingCategory, MarkingPoints>,
    /// Only markings that list species explicitly may be worn.
    pub only_whitelisted: bool,
    /// Markings every member of the species has.
    pub forced_markings: Vec<String>,
    /// Smallest drawn height.
    pub min_height: f32,
    /// Largest drawn height.
    pub max_height: f32,
    /// Scale applied before height.
    pub base_scale: Vec2,
    /// Whether height also scales width.
    pub scale_height: bool,
}

impl SpeciesDef {
    /// Creates a species with unit scale, a `[1, 1]` height range, and no
    /// marking limits.
    #[must_use]
    pub fn new(id: impl Into<String>, sprite_set: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sprite_set: sprite_set.into(),
            marking_points: BTreeMap::new(),
            only_whitelisted: false,
            forced_markings: Vec::new(),
            min_height: 1.0,
            max_height: 1.0,
            base_scale: Vec2::new(1.0, 1.0),
            scale_height: false,
        }
    }
}

/// Base sprites of a species, back-to-front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpriteSetDef {
    /// Sprite set id.
    pub id: String,
    /// Layer and [`BaseSpriteDef`] id pairs in draw order.
    pub sprites: Vec<(HumanoidLayer, String)>,
}

/// One base sprite and how it takes color and markings.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseSpriteDef {
    /// Base sprite id.
    pub id: String,
    /// Sprite drawn by the layer, if any.
    pub base_sprite: Option<SpriteSpecifier>,
    /// Whether the layer is tinted with skin color.
    pub match_skin: bool,
    /// Alpha used with the skin color.
    pub layer_alpha: f32,
    /// Whether markings drawn over this layer are recolored to the skin color.
    pub markings_match_skin: bool,
    /// Whether markings targeting this layer are drawn.
    pub allows_markings: bool,
}

impl BaseSpriteDef {
    /// Creates a skin-matched, opaque base sprite that accepts markings.
    #[must_use]
    pub fn new(id: impl Into<String>, base_sprite: Option<SpriteSpecifier>) -> Self {
        Self {
            id: id.into(),
            base_sprite,
            match_skin: true,
            layer_alpha: 1.0,
            markings_match_skin: false,
            allows_markings: true,
        }
    }
}

/// A marking definition.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkingDef {
    /// Marking id.
    pub id: String,
    /// Category the marking is grouped under.
    pub category: MarkingCategory,
    /// Body part the marking is drawn over.
    pub body_part: HumanoidLayer,
    /// Sprites, one per color slot, back-to-front.
    pub sprites: Vec<SpriteSpecifier>,
    /// Species allowed to wear it; `None` means any.
    pub species_restrictions: Option<Vec<String>>,
    /// Only this sex may wear it.
    pub sex_restriction: Option<Sex>,
    /// Colors come from [`coloring`](Self::coloring) rather than the player.
    pub forced_coloring: bool,
    /// Coloring rules.
    pub coloring: MarkingColoring,
}

impl MarkingDef {
    /// Creates an unrestricted, freely colored marking.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: MarkingCategory,
        body_part: HumanoidLayer,
        sprites: Vec<SpriteSpecifier>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            body_part,
            sprites,
            species_restrictions: None,
            sex_restriction: None,
            forced_coloring: false,
            coloring: MarkingColoring::default(),
        }
    }
}

/// Lookup of definitions by id.
pub trait Catalog {
    /// Looks up a species.
    fn species(&self, id: &str) -> Option<&SpeciesDef>;

    /// Looks up a sprite set.
    fn sprite_set(&self, id: &str) -> Option<&SpriteSetDef>;

    /// Looks up a base sprite.
    fn base_sprite(&self, id: &str) -> Option<&BaseSpriteDef>;

    /// Looks up a marking.
    fn marking(&self, id: &str) -> Option<&MarkingDef>;

    /// Returns the skin alpha if markings `species` draws over `layer` must
    /// take the skin color.
    fn must_match_skin(&self, species: &str, layer: HumanoidLayer) -> Option<f32> {
        let species = self.species(species)?;
        let set = self.sprite_set(&species.sprite_set)?;
        let (_, sprite_id) = set.sprites.iter().find(|(l, _)| *l == layer)?;
        let sprite = self.base_sprite(sprite_id)?;
        sprite.markings_match_skin.then_some(sprite.layer_alpha)
    }

    /// Returns whether `marking` exists and may be worn by `species` and `sex`.
    fn can_be_applied(&self, species: &str, sex: Sex, marking: &Marking) -> bool {
        let (Some(species_def), Some(def)) = (self.species(species), self.marking(&marking.id))
        else {
            return false;
        };
        let species_ok = match &def.species_restrictions {
            Some(allowed) => allowed.iter().any(|s| s == species),
            None => !species_def.only_whitelisted,
        };
        species_ok && def.sex_restriction.is_none_or(|only| only == sex)
    }
}

/// `BTreeMap`-backed [`Catalog`].
#[derive(Clone, Debug, Default)]
pub struct MemoryCatalog {
    species: BTreeMap<String, SpeciesDef>,
    sprite_sets: BTreeMap<String, SpriteSetDef>,
    base_sprites: BTreeMap<String, BaseSpriteDef>,
    markings: BTreeMap<String, MarkingDef>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a species.
    pub fn insert_species(&mut self, def: SpeciesDef) -> &mut Self {
        self.species.insert(def.id.clone(), def);
        self
    }

    /// Adds or replaces a sprite set.
    pub fn insert_sprite_set(&mut self, def: SpriteSetDef) -> &mut Self {
        self.sprite_sets.insert(def.id.clone(), def);
        self
    }

    /// Adds or replaces a base sprite.
    pub fn insert_base_sprite(&mut self, def: BaseSpriteDef) -> &mut Self {
        self.base_sprites.insert(def.id.clone(), def);
        self
    }

    /// Adds or replaces a marking.
    pub fn insert_marking(&mut self, def: MarkingDef) -> &mut Self {
        self.markings.insert(def.id.clone(), def);
        self
    }

    /// Removes a marking, returning it.
    pub fn remove_marking(&mut self, id: &str) -> Option<MarkingDef> {
        self.markings.remove(id)
    }
}

impl Catalog for MemoryCatalog {
    fn species(&self, id: &str) -> Option<&SpeciesDef> {
        self.species.get(id)
    }

    fn sprite_set(&self, id: &str) -> Option<&SpriteSetDef> {
        self.sprite_sets.get(id)
    }

    fn base_sprite(&self, id: &str) -> Option<&BaseSpriteDef> {
        self.base_sprites.get(id)
    }

    fn marking(&self, id: &str) -> Option<&MarkingDef> {
        self.markings.get(id)
    }
}
