// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays keyed layer stack with slot reuse and ordering.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::Vec2;

use super::id::{INVALID, LayerHandle, LayerKey};
use super::sprite::SpriteSpecifier;
use crate::color::Color;
use crate::surface::RenderSurface;

/// Property values of one layer as last reported by
/// [`commit`](LayerStack::commit).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayerRecord {
    pub(crate) sprite: Option<SpriteSpecifier>,
    pub(crate) color: Color,
    pub(crate) visible: bool,
}

/// In-memory [`RenderSurface`].
///
/// Layers are addressed by [`LayerKey`] through the surface API and by
/// [`LayerHandle`] for direct inspection. Internally each layer occupies a
/// slot in parallel arrays; removed layers are recycled via a free list, and
/// generation counters prevent stale handle access.
///
/// The stack remembers the state it had at the last
/// [`commit`](Self::commit), so an observer only ever sees the net effect of
/// a batch of operations.
#[derive(Debug)]
pub struct LayerStack {
    // -- Slot properties --
    pub(crate) key: Vec<Option<LayerKey>>,
    pub(crate) sprite: Vec<Option<SpriteSpecifier>>,
    pub(crate) color: Vec<Color>,
    pub(crate) visible: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Ordering (back-to-front slot indices) --
    pub(crate) order: Vec<u32>,
    pub(crate) map: BTreeMap<LayerKey, LayerHandle>,
    pub(crate) scale: Vec2,

    // -- Committed state --
    pub(crate) committed: BTreeMap<LayerKey, LayerRecord>,
    pub(crate) committed_order: Vec<LayerKey>,
    pub(crate) committed_scale: Vec2,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// Creates an empty layer stack with unit scale.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: Vec::new(),
            sprite: Vec::new(),
            color: Vec::new(),
            visible: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            order: Vec::new(),
            map: BTreeMap::new(),
            scale: Vec2::new(1.0, 1.0),
            committed: BTreeMap::new(),
            committed_order: Vec::new(),
            committed_scale: Vec2::new(1.0, 1.0),
        }
    }

    /// Returns the number of live layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns whether the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the keys of all layers, back-to-front.
    pub fn keys(&self) -> impl Iterator<Item = &LayerKey> + '_ {
        self.order
            .iter()
            .filter_map(|&idx| self.key[idx as usize].as_ref())
    }

    /// Returns the handle of the layer registered under `key`.
    #[must_use]
    pub fn handle(&self, key: &LayerKey) -> Option<LayerHandle> {
        self.map.get(key).copied()
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, handle: LayerHandle) -> bool {
        handle.idx < self.len
            && self.generation[handle.idx as usize] == handle.generation
            && self.key[handle.idx as usize].is_some()
    }

    /// Returns the current stack scale.
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    // -- Keyed getters --

    /// Returns the tint of the layer under `key`.
    #[must_use]
    pub fn color(&self, key: &LayerKey) -> Option<Color> {
        self.map.get(key).map(|h| self.color[h.idx as usize])
    }

    /// Returns the sprite of the layer under `key`, if it has one.
    #[must_use]
    pub fn sprite(&self, key: &LayerKey) -> Option<&SpriteSpecifier> {
        self.map
            .get(key)
            .and_then(|h| self.sprite[h.idx as usize].as_ref())
    }

    // -- Handle getters --

    /// Returns the key a live layer is registered under.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn key_of(&self, handle: LayerHandle) -> &LayerKey {
        self.validate(handle);
        match &self.key[handle.idx as usize] {
            Some(key) => key,
            None => unreachable!("live slot without key"),
        }
    }

    /// Returns the tint of a live layer.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn color_of(&self, handle: LayerHandle) -> Color {
        self.validate(handle);
        self.color[handle.idx as usize]
    }

    /// Returns whether a live layer is visible.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visible_of(&self, handle: LayerHandle) -> bool {
        self.validate(handle);
        self.visible[handle.idx as usize]
    }

    // -- Internal helpers --

    /// Allocates a slot for `key` and places it at `index` in draw order.
    fn insert(&mut self, key: LayerKey, sprite: Option<SpriteSpecifier>, index: usize) -> usize {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.key[idx as usize] = Some(key.clone());
            self.sprite[idx as usize] = sprite;
            self.color[idx as usize] = Color::WHITE;
            self.visible[idx as usize] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.key.push(Some(key.clone()));
            self.sprite.push(sprite);
            self.color.push(Color::WHITE);
            self.visible.push(true);
            self.generation.push(0);
            idx
        };

        let index = index.min(self.order.len());
        self.order.insert(index, idx);
        self.map.insert(
            key,
            LayerHandle {
                idx,
                generation: self.generation[idx as usize],
            },
        );
        index
    }

    fn slot(&self, key: &LayerKey) -> u32 {
        self.map.get(key).map_or(INVALID, |h| h.idx)
    }

    /// Panics if the handle is stale.
    fn validate(&self, handle: LayerHandle) {
        assert!(
            self.is_alive(handle),
            "stale LayerHandle: {handle:?} (current gen: {})",
            if handle.idx < self.len {
                self.generation[handle.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}

impl RenderSurface for LayerStack {
    fn lookup(&self, key: &LayerKey) -> Option<usize> {
        let idx = self.slot(key);
        if idx == INVALID {
            return None;
        }
        self.order.iter().position(|&i| i == idx)
    }

    fn reserve(&mut self, key: &LayerKey) -> usize {
        if let Some(index) = self.lookup(key) {
            return index;
        }
        self.insert(key.clone(), None, usize::MAX)
    }

    fn add_layer(&mut self, key: LayerKey, sprite: &SpriteSpecifier, index: usize) -> usize {
        if let Some(existing) = self.lookup(&key) {
            self.set_sprite(&key, sprite);
            return existing;
        }
        self.insert(key, Some(sprite.clone()), index)
    }

    fn remove_layer(&mut self, key: &LayerKey) -> bool {
        let Some(handle) = self.map.remove(key) else {
            return false;
        };
        let idx = handle.idx;
        self.order.retain(|&i| i != idx);
        self.key[idx as usize] = None;
        self.sprite[idx as usize] = None;

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        true
    }

    fn set_sprite(&mut self, key: &LayerKey, sprite: &SpriteSpecifier) {
        let idx = self.slot(key);
        if idx != INVALID {
            self.sprite[idx as usize] = Some(sprite.clone());
        }
    }

    fn set_color(&mut self, key: &LayerKey, color: Color) {
        let idx = self.slot(key);
        if idx != INVALID {
            self.color[idx as usize] = color;
        }
    }

    fn set_visible(&mut self, key: &LayerKey, visible: bool) {
        let idx = self.slot(key);
        if idx != INVALID {
            self.visible[idx as usize] = visible;
        }
    }

    fn is_visible(&self, key: &LayerKey) -> Option<bool> {
        self.map.get(key).map(|h| self.visible[h.idx as usize])
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }
}
