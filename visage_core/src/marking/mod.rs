// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markings: colorable sprite overlays attached to one body part.
//!
//! A [`Marking`] is a value: a definition id, one color per sprite the
//! definition declares, and a visibility flag. Two markings are the same
//! marking when their ids match; colors and visibility are attributes.
//!
//! [`MarkingSet`] groups a humanoid's markings by [`MarkingCategory`] and
//! enforces per-category capacity. [`coloring`] computes colors for markings
//! whose colors are dictated by rules rather than chosen freely.

pub mod coloring;
mod set;

use alloc::string::String;
use alloc::vec::Vec;

use crate::color::Color;

pub use coloring::{ColoringKind, LayerColoring, MarkingColoring};
pub use set::{MarkingPoints, MarkingSet};

/// Grouping key for markings. Categories order layer application and carry
/// capacity limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkingCategory {
    /// Markings that fit nowhere else.
    Special,
    /// Hair styles.
    Hair,
    /// Facial hair styles.
    FacialHair,
    /// Whole-head markings.
    Head,
    /// Horns, crests, and other top-of-head features.
    HeadTop,
    /// Ears, frills, and other side-of-head features.
    HeadSide,
    /// Snouts and muzzles.
    Snout,
    /// Torso markings.
    Chest,
    /// Upper undergarments.
    UndergarmentTop,
    /// Lower undergarments.
    UndergarmentBottom,
    /// Arm and hand markings.
    Arms,
    /// Leg and foot markings.
    Legs,
    /// Tails.
    Tail,
    /// Full-body overlays.
    Overlay,
}

/// A chosen marking: definition id, per-sprite colors, and visibility.
///
/// The color list is not guaranteed to match the definition's sprite count;
/// sprites without a color are drawn white.
#[derive(Clone, Debug)]
pub struct Marking {
    /// Id of the marking definition in the catalog.
    pub id: String,
    colors: Vec<Color>,
    /// Whether the marking is shown at all.
    pub visible: bool,
}

impl Marking {
    /// Creates a visible marking.
    #[must_use]
    pub fn new(id: impl Into<String>, colors: Vec<Color>) -> Self {
        Self {
            id: id.into(),
            colors,
            visible: true,
        }
    }

    /// Returns the per-sprite colors.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Sets the color of one sprite slot. Out-of-range slots are ignored.
    pub fn set_color(&mut self, index: usize, color: Color) {
        if let Some(slot) = self.colors.get_mut(index) {
            *slot = color;
        }
    }

    /// Sets every sprite slot to `color`.
    pub fn set_all_colors(&mut self, color: Color) {
        for slot in &mut self.colors {
            *slot = color;
        }
    }

    /// Returns whether this marking has the same id and colors as `other`
    /// and the same visibility.
    #[must_use]
    pub fn same_appearance(&self, other: &Self) -> bool {
        self.id == other.id && self.colors == other.colors && self.visible == other.visible
    }
}

impl PartialEq for Marking {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Marking {}
