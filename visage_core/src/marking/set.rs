// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-category marking collection with capacity limits.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::coloring::layer_colors;
use super::{Marking, MarkingCategory};
use crate::appearance::Sex;
use crate::catalog::Catalog;
use crate::color::Color;

/// Capacity and default rules for one marking category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkingPoints {
    /// Maximum number of markings in the category.
    pub points: u32,
    /// Whether the category must hold at least one marking.
    pub required: bool,
    /// Markings inserted when a required category is empty.
    pub default_markings: Vec<String>,
}

impl MarkingPoints {
    /// Creates an optional category with the given capacity.
    #[must_use]
    pub fn limit(points: u32) -> Self {
        Self {
            points,
            required: false,
            default_markings: Vec::new(),
        }
    }

    /// Creates a required category with the given capacity and defaults.
    #[must_use]
    pub fn required(points: u32, default_markings: Vec<String>) -> Self {
        Self {
            points,
            required: true,
            default_markings,
        }
    }
}

/// A humanoid's markings, grouped by category in insertion order.
///
/// Categories with declared [`MarkingPoints`] never hold more markings than
/// their capacity through the public API; additions past the limit are
/// rejected. Categories without declared points are unlimited.
///
/// No operation reorders existing entries. Markings are only appended,
/// filtered out, or cleared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkingSet {
    markings: BTreeMap<MarkingCategory, Vec<Marking>>,
    points: BTreeMap<MarkingCategory, MarkingPoints>,
}

impl MarkingSet {
    /// Creates an empty set with the given category limits.
    #[must_use]
    pub fn new(points: BTreeMap<MarkingCategory, MarkingPoints>) -> Self {
        Self {
            markings: BTreeMap::new(),
            points,
        }
    }

    /// Builds a set from a flat list, routing each marking to its catalog
    /// category. Unknown markings and markings past capacity are dropped.
    #[must_use]
    pub fn from_markings<C: Catalog + ?Sized>(
        list: &[Marking],
        points: BTreeMap<MarkingCategory, MarkingPoints>,
        catalog: &C,
    ) -> Self {
        let mut set = Self::new(points);
        for marking in list {
            if let Some(def) = catalog.marking(&marking.id) {
                set.add_back(def.category, marking.clone());
            }
        }
        set
    }

    /// Returns the declared category limits.
    #[must_use]
    pub fn points(&self) -> &BTreeMap<MarkingCategory, MarkingPoints> {
        &self.points
    }

    /// Returns how many more markings `category` accepts, or `None` if the
    /// category is unlimited.
    #[must_use]
    pub fn remaining_points(&self, category: MarkingCategory) -> Option<u32> {
        let limit = self.points.get(&category)?.points;
        let used = u32::try_from(self.category(category).len()).unwrap_or(u32::MAX);
        Some(limit.saturating_sub(used))
    }

    /// Returns the markings in `category`, in insertion order.
    #[must_use]
    pub fn category(&self, category: MarkingCategory) -> &[Marking] {
        self.markings
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterates all markings, category by category, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkingCategory, &Marking)> + '_ {
        self.markings
            .iter()
            .flat_map(|(category, list)| list.iter().map(move |m| (*category, m)))
    }

    /// Returns the total number of markings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markings.values().map(Vec::len).sum()
    }

    /// Returns whether the set holds no markings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markings.values().all(Vec::is_empty)
    }

    /// Appends `marking` to `category` if the category has capacity left.
    ///
    /// Returns `false` and leaves the set untouched when the category is full.
    pub fn add_back(&mut self, category: MarkingCategory, marking: Marking) -> bool {
        if self.remaining_points(category) == Some(0) {
            return false;
        }
        self.markings.entry(category).or_default().push(marking);
        true
    }

    /// Appends without checking capacity. Only for markings that are not a
    /// player's choice, such as synthetic undergarments.
    pub(crate) fn push_unchecked(&mut self, category: MarkingCategory, marking: Marking) {
        self.markings.entry(category).or_default().push(marking);
    }

    /// Removes the first marking with `id` from `category`. Returns whether
    /// one was removed.
    pub fn remove(&mut self, category: MarkingCategory, id: &str) -> bool {
        let Some(list) = self.markings.get_mut(&category) else {
            return false;
        };
        let Some(pos) = list.iter().position(|m| m.id == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.markings.remove(&category);
        }
        true
    }

    /// Removes every marking in `category`. Returns whether any were removed.
    pub fn remove_category(&mut self, category: MarkingCategory) -> bool {
        self.markings
            .remove(&category)
            .is_some_and(|list| !list.is_empty())
    }

    /// Keeps only the markings for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(MarkingCategory, &Marking) -> bool) {
        for (category, list) in &mut self.markings {
            list.retain(|m| keep(*category, m));
        }
        self.markings.retain(|_, list| !list.is_empty());
    }

    /// Empties every category. Limits are kept.
    pub fn clear(&mut self) {
        self.markings.clear();
    }

    /// Appends every marking of `other`, in its order, subject to this set's
    /// limits. Returns how many were rejected.
    pub fn extend_from(&mut self, other: &Self) -> usize {
        let mut rejected = 0;
        for (category, marking) in other.iter() {
            if !self.add_back(category, marking.clone()) {
                rejected += 1;
            }
        }
        rejected
    }

    /// Removes markings the species cannot wear, recolors markings on
    /// skin-matched body parts, and inserts the species' forced markings when
    /// absent.
    ///
    /// A marking is dropped when its definition is missing, when the species
    /// only accepts whitelisted markings and the definition has no species
    /// list, or when the definition's species list excludes `species`.
    /// Unknown species leave the set untouched.
    pub fn ensure_species<C: Catalog + ?Sized>(
        &mut self,
        species: &str,
        skin_color: Option<Color>,
        catalog: &C,
    ) {
        let Some(species_def) = catalog.species(species) else {
            return;
        };

        self.retain(|_, marking| {
            let Some(def) = catalog.marking(&marking.id) else {
                return false;
            };
            match &def.species_restrictions {
                Some(allowed) => allowed.iter().any(|s| s == species),
                None => !species_def.only_whitelisted,
            }
        });

        if let Some(skin) = skin_color {
            for list in self.markings.values_mut() {
                for marking in list {
                    let alpha = catalog
                        .marking(&marking.id)
                        .and_then(|def| catalog.must_match_skin(species, def.body_part));
                    if let Some(alpha) = alpha {
                        marking.set_all_colors(skin.with_alpha(alpha));
                    }
                }
            }
        }

        for id in &species_def.forced_markings {
            let Some(def) = catalog.marking(id) else {
                continue;
            };
            if self.category(def.category).iter().any(|m| m.id == *id) {
                continue;
            }
            let colors = layer_colors(def, skin_color, None, self);
            self.add_back(def.category, Marking::new(id.clone(), colors));
        }
    }

    /// Removes markings restricted to a sex other than `sex`.
    ///
    /// Markings whose definition is missing are left for
    /// [`ensure_species`](Self::ensure_species) to deal with.
    pub fn ensure_sexes<C: Catalog + ?Sized>(&mut self, sex: Sex, catalog: &C) {
        self.retain(|_, marking| {
            catalog
                .marking(&marking.id)
                .and_then(|def| def.sex_restriction)
                .is_none_or(|only| only == sex)
        });
    }

    /// Fills every empty required category with its default markings, colored
    /// by each default's coloring rules.
    ///
    /// Categories that already hold a marking are left alone, so applying this
    /// more than once has no further effect.
    pub fn ensure_default<C: Catalog + ?Sized>(
        &mut self,
        skin_color: Option<Color>,
        eye_color: Option<Color>,
        catalog: &C,
    ) {
        let wanted: Vec<(MarkingCategory, Vec<String>)> = self
            .points
            .iter()
            .filter(|(category, points)| {
                points.required
                    && !points.default_markings.is_empty()
                    && self.category(**category).is_empty()
            })
            .map(|(category, points)| (*category, points.default_markings.clone()))
            .collect();

        for (category, defaults) in wanted {
            for id in defaults {
                let Some(def) = catalog.marking(&id) else {
                    continue;
                };
                let colors = layer_colors(def, skin_color, eye_color, self);
                self.add_back(category, Marking::new(id, colors));
            }
        }
    }
}
