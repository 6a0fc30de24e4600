// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer composition: base layers, scale, and eye color.
//!
//! A full pass runs, in order:
//!
//! 1. **Base layers** from the species sprite set, skipping slots that have a
//!    custom override. Chest and head sprites resolve their per-sex variant.
//!    Skin-matched sprites take the skin color with the sprite's alpha.
//! 2. **Custom overrides**, which keep their explicit color. Skin matching
//!    never applies to them.
//! 3. **Stale layers**: slots resolved on the previous pass but declared by
//!    neither the sprite set nor an override are hidden. Surface slots are
//!    reused across passes, so they are never removed.
//! 4. **Markings** and synthetic undergarments, via
//!    [`reconcile`](crate::reconcile).
//! 5. **Scale** from the species base scale and the clamped height.
//! 6. **Eye color** on the eyes slot.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;

use kurbo::Vec2;

use crate::appearance::{AppearanceState, Sex};
use crate::catalog::{BaseSpriteDef, Catalog, SpeciesDef};
use crate::color::Color;
use crate::layer::{HumanoidLayer, LayerKey};
use crate::reconcile;
use crate::surface::RenderSurface;
use crate::system::EntityId;
#[cfg(feature = "trace-rich")]
use crate::trace::MarkingAppliedEvent;
use crate::trace::{
    PassBeginEvent, PassEndEvent, PassSummary, PassTrigger, SkipEvent, SkipReason, Tracer,
};

/// One composition pass in flight: its tracer and running counters.
pub(crate) struct Pass<'t> {
    tracer: Tracer<'t>,
    entity: EntityId,
    pub(crate) summary: PassSummary,
}

impl<'t> Pass<'t> {
    /// Starts a pass and emits its begin event.
    pub(crate) fn begin(
        mut tracer: Tracer<'t>,
        pass: u64,
        entity: EntityId,
        trigger: PassTrigger,
    ) -> Self {
        tracer.pass_begin(&PassBeginEvent {
            pass,
            entity,
            trigger,
        });
        Self {
            tracer,
            entity,
            summary: PassSummary::new(pass),
        }
    }

    /// Records a skipped piece.
    pub(crate) fn skip(&mut self, reason: SkipReason, id: &str) {
        self.summary.skips += 1;
        self.tracer.skip(&SkipEvent {
            pass: self.summary.pass,
            reason,
            id,
        });
    }

    #[cfg(feature = "trace-rich")]
    pub(crate) fn marking_applied(
        &mut self,
        marking: &str,
        body_part: HumanoidLayer,
        visible: bool,
        sprites: u32,
    ) {
        self.tracer.marking_applied(&MarkingAppliedEvent {
            pass: self.summary.pass,
            marking,
            body_part,
            visible,
            sprites,
        });
    }

    /// Emits the end event and returns the counters.
    pub(crate) fn end(mut self) -> PassSummary {
        self.tracer.pass_end(&PassEndEvent {
            pass: self.summary.pass,
            entity: self.entity,
            summary: self.summary,
        });
        self.summary
    }
}

impl core::fmt::Debug for Pass<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pass")
            .field("entity", &self.entity)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// Composes every layer of `state` onto `surface`.
///
/// `censor` enables synthetic undergarments for slots no marking covers.
pub(crate) fn update_sprite<C, S>(
    state: &mut AppearanceState,
    surface: &mut S,
    catalog: &C,
    censor: bool,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    update_layers(state, surface, catalog, pass);
    reconcile::apply_marking_set(state, surface, catalog, censor, pass);

    // A missing species was already reported by `update_layers`.
    if let Some(species) = catalog.species(&state.species) {
        surface.set_scale(composed_scale(species, state.height));
    }

    let eyes = LayerKey::Identifier(HumanoidLayer::Eyes);
    surface.reserve(&eyes);
    surface.set_color(&eyes, state.eye_color);
}

/// Returns the sprite scale for a humanoid of `height`.
///
/// Height is rounded to hundredths and then clamped into the species range,
/// here and nowhere else, so a stored height outside the range is not an
/// error. Width follows height only when the species scales height.
#[must_use]
pub fn composed_scale(species: &SpeciesDef, height: f32) -> Vec2 {
    let height = round_hundredths(f64::from(height))
        .max(f64::from(species.min_height))
        .min(f64::from(species.max_height));
    let width = if species.scale_height { height } else { 1.0 };
    Vec2::new(species.base_scale.x * width, species.base_scale.y * height)
}

/// Rounds to two decimals, halves away from zero. Non-finite and huge values
/// pass through unchanged.
fn round_hundredths(value: f64) -> f64 {
    // NaN fails both comparisons.
    if !(value > -1e15 && value < 1e15) {
        return value;
    }
    let half = if value < 0.0 { -0.5 } else { 0.5 };
    #[expect(
        clippy::cast_possible_truncation,
        reason = "magnitude bounded above, well inside i64"
    )]
    let whole = (value * 100.0 + half) as i64;
    whole as f64 / 100.0
}

/// How one base slot should be written.
#[derive(Clone, Copy, Debug)]
struct LayerData<'a> {
    layer: HumanoidLayer,
    id: Option<&'a str>,
    sex_morph: bool,
    color: Option<Color>,
    override_skin: bool,
}

fn update_layers<C, S>(
    state: &mut AppearanceState,
    surface: &mut S,
    catalog: &C,
    pass: &mut Pass<'_>,
) where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    let mut stale: BTreeSet<HumanoidLayer> =
        core::mem::take(&mut state.base_layers).into_keys().collect();
    let mut resolved = BTreeMap::new();

    let sprites: &[(HumanoidLayer, String)] = match catalog.species(&state.species) {
        None => {
            pass.skip(SkipReason::MissingSpecies, &state.species);
            &[]
        }
        Some(species) => match catalog.sprite_set(&species.sprite_set) {
            None => {
                pass.skip(SkipReason::MissingSpriteSet, &species.sprite_set);
                &[]
            }
            Some(set) => &set.sprites,
        },
    };

    for (layer, id) in sprites {
        stale.remove(layer);
        if state.custom_base_layers.contains_key(layer) {
            continue;
        }
        let data = LayerData {
            layer: *layer,
            id: Some(id.as_str()),
            sex_morph: true,
            color: None,
            override_skin: false,
        };
        if let Some(def) = set_layer_data(state, surface, catalog, data, pass) {
            resolved.insert(*layer, def);
        }
    }

    for (layer, custom) in &state.custom_base_layers {
        stale.remove(layer);
        let data = LayerData {
            layer: *layer,
            id: custom.id.as_deref(),
            sex_morph: false,
            color: custom.color,
            override_skin: true,
        };
        if let Some(def) = set_layer_data(state, surface, catalog, data, pass) {
            resolved.insert(*layer, def);
        }
    }

    for layer in stale {
        let key = LayerKey::Identifier(layer);
        if surface.lookup(&key).is_some() {
            surface.set_visible(&key, false);
            pass.summary.stale_hidden += 1;
        }
    }

    state.base_layers = resolved;
}

/// Writes one base slot and returns the definition it resolved to.
///
/// The slot is reserved and its visibility and explicit color are applied even
/// when no definition is found.
fn set_layer_data<C, S>(
    state: &AppearanceState,
    surface: &mut S,
    catalog: &C,
    data: LayerData<'_>,
    pass: &mut Pass<'_>,
) -> Option<BaseSpriteDef>
where
    C: Catalog + ?Sized,
    S: RenderSurface + ?Sized,
{
    let key = LayerKey::Identifier(data.layer);
    surface.reserve(&key);
    surface.set_visible(&key, !state.is_hidden(data.layer));
    if let Some(color) = data.color {
        surface.set_color(&key, color);
    }

    let id = data.id?;
    let def = if data.sex_morph {
        morphed_base_sprite(catalog, data.layer, state.sex, id)
    } else {
        catalog.base_sprite(id)
    };
    let Some(def) = def else {
        pass.skip(SkipReason::MissingBaseSprite, id);
        return None;
    };

    if def.match_skin && !data.override_skin {
        surface.set_color(&key, state.skin_color.with_alpha(def.layer_alpha));
    }
    if let Some(sprite) = &def.base_sprite {
        surface.set_sprite(&key, sprite);
    }
    Some(def.clone())
}

/// Looks up the per-sex variant of `id`, falling back to `id` itself.
fn morphed_base_sprite<'c, C>(
    catalog: &'c C,
    layer: HumanoidLayer,
    sex: Sex,
    id: &str,
) -> Option<&'c BaseSpriteDef>
where
    C: Catalog + ?Sized,
{
    let morphed = layer.sex_morph(sex, id);
    catalog
        .base_sprite(&morphed)
        .or_else(|| catalog.base_sprite(id))
}

/// Retints skin-matched base layers with the current skin color.
///
/// Layers with a custom override keep their explicit color, and layers that
/// do not match skin are left untouched.
pub(crate) fn apply_skin_color<S>(state: &AppearanceState, surface: &mut S)
where
    S: RenderSurface + ?Sized,
{
    for (layer, def) in &state.base_layers {
        if !def.match_skin || state.custom_base_layers.contains_key(layer) {
            continue;
        }
        let key = LayerKey::Identifier(*layer);
        surface.reserve(&key);
        surface.set_color(&key, state.skin_color.with_alpha(def.layer_alpha));
    }
}
