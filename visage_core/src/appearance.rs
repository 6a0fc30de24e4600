// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolved humanoid appearance attributes.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;

use bitflags::bitflags;

use crate::catalog::BaseSpriteDef;
use crate::color::Color;
use crate::layer::HumanoidLayer;
use crate::marking::MarkingSet;

/// Biological sex, used for sex-morphed sprites and sex-restricted markings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Male.
    #[default]
    Male,
    /// Female.
    Female,
    /// No sex; never morphs sprites.
    Unsexed,
}

/// Grammatical gender. Carried for completeness; composition ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gender {
    /// They/them.
    #[default]
    Epicene,
    /// She/her.
    Female,
    /// He/him.
    Male,
    /// It/its.
    Neuter,
}

bitflags! {
    /// Equipment slots that can hide a body-part layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SlotFlags: u32 {
        /// Headwear.
        const HEAD = 1 << 0;
        /// Eyewear.
        const EYES = 1 << 1;
        /// Earpieces.
        const EARS = 1 << 2;
        /// Masks.
        const MASK = 1 << 3;
        /// Suits and coats.
        const OUTERCLOTHING = 1 << 4;
        /// Jumpsuits.
        const INNERCLOTHING = 1 << 5;
        /// Neckwear.
        const NECK = 1 << 6;
        /// Backpacks.
        const BACK = 1 << 7;
        /// Gloves.
        const GLOVES = 1 << 8;
        /// Shoes.
        const FEET = 1 << 9;
        /// Undershirts.
        const UNDERSHIRT = 1 << 10;
        /// Underpants.
        const UNDERPANTS = 1 << 11;
    }
}

/// A per-humanoid replacement for a species base sprite.
///
/// A missing `id` keeps whatever sprite the layer has and only applies
/// `color` and visibility.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomBaseLayer {
    /// Base sprite id in the catalog.
    pub id: Option<String>,
    /// Explicit tint. Skin matching never overrides it.
    pub color: Option<Color>,
}

/// Everything needed to draw one humanoid.
///
/// Replicated attributes are public. The resolved base layers and the applied
/// marking snapshot describe what the render surface currently shows; they
/// are written only by composition and reconciliation.
#[derive(Clone, Debug)]
pub struct AppearanceState {
    /// Species id in the catalog.
    pub species: String,
    /// Sex.
    pub sex: Sex,
    /// Gender.
    pub gender: Gender,
    /// Age in years.
    pub age: u32,
    /// Stored height. Clamped to the species range only when composing.
    pub height: f32,
    /// Skin color.
    pub skin_color: Color,
    /// Eye color.
    pub eye_color: Color,
    /// Per-layer base sprite overrides.
    pub custom_base_layers: BTreeMap<HumanoidLayer, CustomBaseLayer>,
    /// Layers hidden regardless of equipment.
    pub permanently_hidden: BTreeSet<HumanoidLayer>,
    /// Layers hidden by equipment, with the slots doing the hiding.
    pub hidden_layers: BTreeMap<HumanoidLayer, SlotFlags>,
    /// Active markings.
    pub markings: MarkingSet,
    /// Marking drawn in the upper undergarment slot when nudity is censored.
    pub undergarment_top: Option<String>,
    /// Marking drawn in the lower undergarment slot when nudity is censored.
    pub undergarment_bottom: Option<String>,

    pub(crate) base_layers: BTreeMap<HumanoidLayer, BaseSpriteDef>,
    pub(crate) applied_markings: MarkingSet,
}

impl AppearanceState {
    /// Creates a state for `species` with default attributes and no markings.
    #[must_use]
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            sex: Sex::default(),
            gender: Gender::default(),
            age: 18,
            height: 1.0,
            skin_color: Color::WHITE,
            eye_color: Color::BLACK,
            custom_base_layers: BTreeMap::new(),
            permanently_hidden: BTreeSet::new(),
            hidden_layers: BTreeMap::new(),
            markings: MarkingSet::default(),
            undergarment_top: None,
            undergarment_bottom: None,
            base_layers: BTreeMap::new(),
            applied_markings: MarkingSet::default(),
        }
    }

    /// Returns whether `layer` is hidden permanently or by equipment.
    #[must_use]
    pub fn is_hidden(&self, layer: HumanoidLayer) -> bool {
        self.hidden_layers.contains_key(&layer) || self.permanently_hidden.contains(&layer)
    }

    /// Returns the base sprites resolved by the last composition pass.
    #[must_use]
    pub fn base_layers(&self) -> &BTreeMap<HumanoidLayer, BaseSpriteDef> {
        &self.base_layers
    }

    /// Returns the markings currently reflected on the render surface.
    #[must_use]
    pub fn applied_markings(&self) -> &MarkingSet {
        &self.applied_markings
    }

    /// Replaces every replicated attribute with `incoming`'s, keeping what
    /// this side last drew.
    pub fn replace_replicated(&mut self, incoming: Self) {
        let base_layers = core::mem::take(&mut self.base_layers);
        let applied = core::mem::take(&mut self.applied_markings);
        *self = Self {
            base_layers,
            applied_markings: applied,
            ..incoming
        };
    }

    /// Updates equipment hiding for `layer`. Returns whether the hidden map
    /// changed.
    ///
    /// Showing with a slot clears only that slot's bits, so a layer covered by
    /// two items stays hidden until both are removed. Showing without a slot
    /// clears the layer outright. Hiding adds the slot's bits, or records the
    /// layer with no slot bits when no slot is given.
    pub fn set_layer_hidden_by(
        &mut self,
        layer: HumanoidLayer,
        visible: bool,
        slot: Option<SlotFlags>,
    ) -> bool {
        if visible {
            let Some(slot) = slot else {
                return self.hidden_layers.remove(&layer).is_some();
            };
            let Some(old) = self.hidden_layers.get(&layer).copied() else {
                return false;
            };
            let new = old.difference(slot);
            if new.is_empty() {
                self.hidden_layers.remove(&layer);
                return true;
            }
            self.hidden_layers.insert(layer, new);
            return old != new;
        }

        match (self.hidden_layers.get(&layer).copied(), slot) {
            (Some(old), Some(slot)) => {
                let new = old.union(slot);
                self.hidden_layers.insert(layer, new);
                old != new
            }
            (Some(_), None) => false,
            (None, slot) => {
                self.hidden_layers.insert(layer, slot.unwrap_or_default());
                true
            }
        }
    }
}
