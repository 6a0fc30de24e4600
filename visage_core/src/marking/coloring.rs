// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule-based marking colors.
//!
//! Markings with forced coloring do not store the colors a player picked;
//! their colors are derived from the humanoid's skin and eye colors or from
//! markings already in the set. Each sprite of a definition resolves through a
//! [`LayerColoring`]: the primary [`ColoringKind`] is tried first, then each
//! fallback in order, then the fallback color. `negative` inverts the result.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::{MarkingCategory, MarkingSet};
use crate::catalog::MarkingDef;
use crate::color::Color;

/// Where a sprite's color comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum ColoringKind {
    /// The humanoid's skin color.
    Skin,
    /// The humanoid's eye color.
    Eye,
    /// A constant color.
    Fixed(Color),
    /// The first color of the first marking in a category.
    Category(MarkingCategory),
    /// The first color of a specific marking, wherever it sits in the set.
    Marking(String),
}

impl ColoringKind {
    fn resolve(&self, skin: Option<Color>, eye: Option<Color>, set: &MarkingSet) -> Option<Color> {
        match self {
            Self::Skin => skin,
            Self::Eye => eye,
            Self::Fixed(color) => Some(*color),
            Self::Category(category) => set
                .category(*category)
                .first()
                .and_then(|m| m.colors().first().copied()),
            Self::Marking(id) => set
                .iter()
                .find(|(_, m)| m.id == *id)
                .and_then(|(_, m)| m.colors().first().copied()),
        }
    }
}

/// Coloring rule for one sprite of a marking.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerColoring {
    /// Primary source.
    pub kind: ColoringKind,
    /// Sources tried in order when the primary yields nothing.
    pub fallbacks: Vec<ColoringKind>,
    /// Color used when no source yields anything.
    pub fallback_color: Color,
    /// Whether to invert the resolved RGB.
    pub negative: bool,
}

impl Default for LayerColoring {
    fn default() -> Self {
        Self::new(ColoringKind::Skin)
    }
}

impl LayerColoring {
    /// Creates a rule with no fallbacks and a white fallback color.
    #[must_use]
    pub fn new(kind: ColoringKind) -> Self {
        Self {
            kind,
            fallbacks: Vec::new(),
            fallback_color: Color::WHITE,
            negative: false,
        }
    }

    /// Appends a fallback source.
    #[must_use]
    pub fn or(mut self, kind: ColoringKind) -> Self {
        self.fallbacks.push(kind);
        self
    }

    /// Resolves the color for this rule.
    #[must_use]
    pub fn resolve(&self, skin: Option<Color>, eye: Option<Color>, set: &MarkingSet) -> Color {
        let color = core::iter::once(&self.kind)
            .chain(&self.fallbacks)
            .find_map(|kind| kind.resolve(skin, eye, set))
            .unwrap_or(self.fallback_color);
        if self.negative { color.inverted() } else { color }
    }
}

/// Coloring rules for every sprite of a marking definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkingColoring {
    /// Rule for sprites without an override.
    pub default: LayerColoring,
    /// Per-sprite-state overrides.
    pub layers: BTreeMap<String, LayerColoring>,
}

impl MarkingColoring {
    /// Creates coloring where every sprite uses `rule`.
    #[must_use]
    pub fn uniform(rule: LayerColoring) -> Self {
        Self {
            default: rule,
            layers: BTreeMap::new(),
        }
    }
}

/// Computes one color per sprite of `def`.
///
/// Rules may read colors of markings already in `set`, so callers add the
/// markings a rule depends on before resolving it.
#[must_use]
pub fn layer_colors(
    def: &MarkingDef,
    skin: Option<Color>,
    eye: Option<Color>,
    set: &MarkingSet,
) -> Vec<Color> {
    def.sprites
        .iter()
        .map(|sprite| {
            let rule = sprite
                .state()
                .and_then(|state| def.coloring.layers.get(state))
                .unwrap_or(&def.coloring.default);
            rule.resolve(skin, eye, set)
        })
        .collect()
}
