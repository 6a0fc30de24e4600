// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-surface contract for sprite integrations.
//!
//! A render surface is an ordered, keyed stack of sprite layers. Index 0 is
//! drawn first (back-most); higher indices draw on top. Composition never
//! holds indices across calls that change the stack, and addresses layers by
//! [`LayerKey`] wherever it can.
//!
//! Every operation is treated as best-effort idempotent: setting a property to
//! the value it already has must be harmless, and operations on keys the
//! surface does not know are no-ops.
//!
//! [`LayerStack`](crate::layer::LayerStack) is the in-memory implementation
//! used by tests and headless tools. Engine integrations implement this trait
//! over their native sprite component.

use kurbo::Vec2;

use crate::color::Color;
use crate::layer::{LayerKey, SpriteSpecifier};

/// An ordered, keyed stack of sprite layers owned by one humanoid.
///
/// # Composition pass pseudocode
///
/// ```rust,ignore
/// fn on_state_changed(state: &mut AppearanceState, surface: &mut impl RenderSurface) {
///     // Base layers: reserve identifier slots, assign sprites and colors.
///     let eyes = LayerKey::Identifier(HumanoidLayer::Eyes);
///     surface.reserve(&eyes);
///     surface.set_color(&eyes, state.eye_color);
///
///     // Markings: derived keys inserted just above their body part.
///     let target = surface.lookup(&LayerKey::Identifier(HumanoidLayer::Hair))?;
///     surface.add_layer(LayerKey::derived("LongHair", "long"), &sprite, target + 1);
/// }
/// ```
pub trait RenderSurface {
    /// Returns the current index of the layer registered under `key`.
    fn lookup(&self, key: &LayerKey) -> Option<usize>;

    /// Returns the index of the layer registered under `key`, appending a
    /// blank, visible, white layer on top if none exists.
    fn reserve(&mut self, key: &LayerKey) -> usize;

    /// Inserts a layer drawing `sprite` at `index` (clamped to the stack
    /// length) and registers it under `key`.
    ///
    /// If `key` is already registered, the existing layer keeps its position
    /// and only its sprite is replaced. Returns the layer's index.
    fn add_layer(&mut self, key: LayerKey, sprite: &SpriteSpecifier, index: usize) -> usize;

    /// Removes the layer registered under `key`. Returns whether one existed.
    fn remove_layer(&mut self, key: &LayerKey) -> bool;

    /// Assigns the sprite drawn by the layer under `key`.
    fn set_sprite(&mut self, key: &LayerKey, sprite: &SpriteSpecifier);

    /// Sets the tint of the layer under `key`.
    fn set_color(&mut self, key: &LayerKey, color: Color);

    /// Shows or hides the layer under `key`.
    fn set_visible(&mut self, key: &LayerKey, visible: bool);

    /// Returns whether the layer under `key` is visible, or `None` if absent.
    fn is_visible(&self, key: &LayerKey) -> Option<bool>;

    /// Sets the scale applied to the whole stack.
    fn set_scale(&mut self, scale: Vec2);
}
