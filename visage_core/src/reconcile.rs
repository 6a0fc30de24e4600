// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marking reconciliation against the applied snapshot.
//!
//! Every pass takes down the layers of the previously applied markings and of
//! the current set, then applies the current set from scratch and records a
//! copy of it as the new snapshot. Marking layers are keyed by marking id and
//! sprite state, so reapplying an unchanged marking lands on the same key at
//! the same position. [`LayerStack::commit`](crate::layer::LayerStack::commit)
//! reports only the net result.
//!
//! Synthetic undergarments are written into the snapshot, never into the
//! player's set, so turning censoring off removes them on the next pass.

use alloc::string::String;
use alloc::vec::Vec;

use crate::appearance::AppearanceState;
use crate::catalog::{Catalog, MarkingDef};
use crate::color::Color;
use crate::compose::Pass;
use crate::layer::{HumanoidLayer, LayerKey, SpriteSpecifier};
use crate::marking::{Marking, MarkingCategory};
use crate::surface::RenderSurface;
use crate::trace::SkipReason;

/// Replaces the marking layers on `surface` with those of `state.markings`.
pub(crate) fn apply_marking_set<C, S>(
    state: &mut AppearanceState,
    surface: &mut S,
    catalog: &C,
    censor: bool,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    clear_all_markings(state, surface, catalog, pass);

    // A marking already drawn on an undergarment slot wins over the synthetic one.
    let mut top = censor;
    let mut bottom = censor;

    for (_, marking) in state.markings.iter() {
        let Some(def) = catalog.marking(&marking.id) else {
            pass.skip(SkipReason::MissingMarking, &marking.id);
            continue;
        };
        apply_marking(state, surface, def, Some(marking.colors()), marking.visible, pass);
        match def.body_part {
            HumanoidLayer::UndergarmentTop => top = false,
            HumanoidLayer::UndergarmentBottom => bottom = false,
            _ => {}
        }
    }

    state.applied_markings = state.markings.clone();
    add_undergarments(state, surface, catalog, top, bottom, pass);
}

/// Reapplies the markings drawn over `layer` after its visibility changed.
pub(crate) fn reapply_body_part<C, S>(
    state: &AppearanceState,
    surface: &mut S,
    catalog: &C,
    layer: HumanoidLayer,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    for (_, marking) in state.markings.iter() {
        let Some(def) = catalog.marking(&marking.id) else {
            continue;
        };
        if def.body_part == layer {
            apply_marking(state, surface, def, Some(marking.colors()), marking.visible, pass);
        }
    }
}

/// Shows or hides the base layer for `layer`. Returns whether the surface
/// changed.
///
/// A layer the surface does not have is reserved when shown and ignored when
/// hidden.
pub(crate) fn set_base_visible<S>(surface: &mut S, layer: HumanoidLayer, visible: bool) -> bool
where
    S: RenderSurface + ?Sized,
{
    let key = LayerKey::Identifier(layer);
    if surface.lookup(&key).is_none() {
        if !visible {
            return false;
        }
        surface.reserve(&key);
    }
    if surface.is_visible(&key) == Some(visible) {
        return false;
    }
    surface.set_visible(&key, visible);
    true
}

fn clear_all_markings<C, S>(
    state: &mut AppearanceState,
    surface: &mut S,
    catalog: &C,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    for (_, marking) in state.applied_markings.iter() {
        pass.summary.layers_removed += remove_marking(surface, catalog, &marking.id);
    }
    state.applied_markings.clear();

    for (_, marking) in state.markings.iter() {
        pass.summary.layers_removed += remove_marking(surface, catalog, &marking.id);
    }
}

/// Removes every sprite layer of marking `id`. Returns how many existed.
fn remove_marking<C, S>(surface: &mut S, catalog: &C, id: &str) -> u32
where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    let Some(def) = catalog.marking(id) else {
        return 0;
    };
    let mut removed = 0;
    for state in def.sprites.iter().filter_map(SpriteSpecifier::state) {
        if surface.remove_layer(&LayerKey::derived(&def.id, state)) {
            removed += 1;
        }
    }
    removed
}

fn add_undergarments<C, S>(
    state: &mut AppearanceState,
    surface: &mut S,
    catalog: &C,
    top: bool,
    bottom: bool,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    let slots: [(bool, Option<String>, MarkingCategory); 2] = [
        (
            top,
            state.undergarment_top.clone(),
            MarkingCategory::UndergarmentTop,
        ),
        (
            bottom,
            state.undergarment_bottom.clone(),
            MarkingCategory::UndergarmentBottom,
        ),
    ];

    for (wanted, id, category) in slots {
        let Some(id) = id.filter(|_| wanted) else {
            continue;
        };
        let Some(def) = catalog.marking(&id) else {
            pass.skip(SkipReason::MissingMarking, &id);
            continue;
        };
        state
            .applied_markings
            .push_unchecked(category, Marking::new(id, Vec::new()));
        apply_marking(state, surface, def, None, true, pass);
        pass.summary.undergarments += 1;
    }
}

/// Places the sprite layers of one marking just above its body part.
///
/// Sprites without a color in `colors` are drawn white. Layers are hidden when
/// the marking is, when the body part is hidden, or when the body part's base
/// sprite does not accept markings.
fn apply_marking<S>(
    state: &AppearanceState,
    surface: &mut S,
    def: &MarkingDef,
    colors: Option<&[Color]>,
    visible: bool,
    pass: &mut Pass<'_>,
) where
    S: RenderSurface + ?Sized,
{
    let Some(target) = surface.lookup(&LayerKey::Identifier(def.body_part)) else {
        pass.skip(SkipReason::MissingTargetLayer, &def.id);
        return;
    };

    let setting = state.base_layers.get(&def.body_part);
    let visible = visible
        && !state.is_hidden(def.body_part)
        && setting.is_some_and(|base| base.allows_markings);

    for (j, sprite) in def.sprites.iter().enumerate() {
        // Only sprite-sheet states can be keyed.
        let Some(sprite_state) = sprite.state() else {
            continue;
        };
        let key = LayerKey::derived(&def.id, sprite_state);
        if surface.lookup(&key).is_none() {
            surface.add_layer(key.clone(), sprite, target + j + 1);
        }
        surface.set_visible(&key, visible);
        if !visible {
            continue;
        }
        let color = colors
            .and_then(|colors| colors.get(j))
            .copied()
            .unwrap_or(Color::WHITE);
        surface.set_color(&key, color);
    }

    pass.summary.markings_applied += 1;
    #[cfg(feature = "trace-rich")]
    pass.marking_applied(
        &def.id,
        def.body_part,
        visible,
        u32::try_from(def.sprites.len()).unwrap_or(u32::MAX),
    );
}
