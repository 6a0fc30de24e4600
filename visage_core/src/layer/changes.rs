// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Net change reporting for [`LayerStack`].
//!
//! A composition pass issues many surface operations, some of which cancel
//! out: reconciliation removes every marking layer and then re-adds the ones
//! that are still wanted. [`LayerStack::commit`] compares the stack against
//! the state recorded at the previous commit and reports only what an
//! observer would see change:
//!
//! - keys that appeared or disappeared,
//! - layers whose tint, sprite, or visibility differs,
//! - whether the relative order of surviving layers changed,
//! - whether the stack scale changed.
//!
//! A layer that was removed and re-added under the same key with identical
//! properties and position does not appear in the report.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use super::id::LayerKey;
use super::stack::{LayerRecord, LayerStack};

/// The net set of changes produced by a single [`LayerStack::commit`] call.
#[derive(Clone, Debug, Default)]
pub struct SurfaceChanges {
    /// Keys registered since the last commit.
    pub added: Vec<LayerKey>,
    /// Keys no longer registered.
    pub removed: Vec<LayerKey>,
    /// Surviving layers whose tint changed.
    pub recolored: Vec<LayerKey>,
    /// Surviving layers whose sprite changed.
    pub sprites: Vec<LayerKey>,
    /// Surviving layers that became visible.
    pub shown: Vec<LayerKey>,
    /// Surviving layers that became hidden.
    pub hidden: Vec<LayerKey>,
    /// Whether surviving layers changed relative order.
    pub reordered: bool,
    /// Whether the stack scale changed.
    pub rescaled: bool,
}

impl SurfaceChanges {
    /// Returns `true` if nothing observable changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.recolored.is_empty()
            && self.sprites.is_empty()
            && self.shown.is_empty()
            && self.hidden.is_empty()
            && !self.reordered
            && !self.rescaled
    }

    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
        self.recolored.clear();
        self.sprites.clear();
        self.shown.clear();
        self.hidden.clear();
        self.reordered = false;
        self.rescaled = false;
    }
}

impl LayerStack {
    /// Reports the net changes since the previous commit and records the
    /// current state as committed.
    pub fn commit(&mut self) -> SurfaceChanges {
        let mut changes = SurfaceChanges::default();
        self.commit_into(&mut changes);
        changes
    }

    /// Like [`commit`](Self::commit), but reuses a caller-provided buffer.
    pub fn commit_into(&mut self, changes: &mut SurfaceChanges) {
        changes.clear();

        let mut current = BTreeMap::new();
        let mut current_order = Vec::with_capacity(self.order.len());
        for &idx in &self.order {
            let Some(key) = &self.key[idx as usize] else {
                continue;
            };
            current_order.push(key.clone());
            current.insert(
                key.clone(),
                LayerRecord {
                    sprite: self.sprite[idx as usize].clone(),
                    color: self.color[idx as usize],
                    visible: self.visible[idx as usize],
                },
            );
        }

        for (key, now) in &current {
            let Some(before) = self.committed.get(key) else {
                changes.added.push(key.clone());
                continue;
            };
            if before.color != now.color {
                changes.recolored.push(key.clone());
            }
            if before.sprite != now.sprite {
                changes.sprites.push(key.clone());
            }
            match (before.visible, now.visible) {
                (false, true) => changes.shown.push(key.clone()),
                (true, false) => changes.hidden.push(key.clone()),
                _ => {}
            }
        }
        changes.removed = self
            .committed
            .keys()
            .filter(|key| !current.contains_key(*key))
            .cloned()
            .collect();

        let survivors_before = self
            .committed_order
            .iter()
            .filter(|key| current.contains_key(*key));
        let survivors_now = current_order
            .iter()
            .filter(|key| self.committed.contains_key(*key));
        changes.reordered = !survivors_before.eq(survivors_now);
        changes.rescaled = self.committed_scale != self.scale;

        self.committed = current;
        self.committed_order = current_order;
        self.committed_scale = self.scale;
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Vec2;

    use super::*;
    use crate::color::Color;
    use crate::layer::{HumanoidLayer, SpriteSpecifier};
    use crate::surface::RenderSurface;

    fn id(layer: HumanoidLayer) -> LayerKey {
        LayerKey::Identifier(layer)
    }

    #[test]
    fn first_commit_reports_additions() {
        let mut stack = LayerStack::new();
        stack.reserve(&id(HumanoidLayer::Chest));
        stack.reserve(&id(HumanoidLayer::Head));
        let changes = stack.commit();
        assert_eq!(changes.added.len(), 2);
        assert!(!changes.reordered);
        assert!(stack.commit().is_empty(), "second commit should be empty");
    }

    #[test]
    fn remove_then_readd_is_invisible() {
        let mut stack = LayerStack::new();
        stack.reserve(&id(HumanoidLayer::Chest));
        let key = LayerKey::derived("Tattoo", "chest");
        let sprite = SpriteSpecifier::rsi("tattoo.rsi", "chest");
        stack.add_layer(key.clone(), &sprite, 1);
        stack.set_color(&key, Color::BLACK);
        let _ = stack.commit();

        stack.remove_layer(&key);
        stack.add_layer(key.clone(), &sprite, 1);
        stack.set_color(&key, Color::BLACK);
        let changes = stack.commit();
        assert!(changes.is_empty(), "net diff should be empty: {changes:?}");
    }

    #[test]
    fn property_changes_are_reported() {
        let mut stack = LayerStack::new();
        let head = id(HumanoidLayer::Head);
        let eyes = id(HumanoidLayer::Eyes);
        stack.reserve(&head);
        stack.reserve(&eyes);
        let _ = stack.commit();

        stack.set_color(&eyes, Color::BLACK);
        stack.set_visible(&head, false);
        stack.set_sprite(&head, &SpriteSpecifier::rsi("head.rsi", "head"));
        stack.set_scale(Vec2::new(1.0, 1.1));
        let changes = stack.commit();
        assert_eq!(changes.recolored, [eyes]);
        assert_eq!(changes.hidden, [head.clone()]);
        assert_eq!(changes.sprites, [head]);
        assert!(changes.rescaled);
        assert!(changes.shown.is_empty());
    }

    #[test]
    fn removal_and_reorder_are_reported() {
        let mut stack = LayerStack::new();
        let a = LayerKey::derived("A", "a");
        let b = LayerKey::derived("B", "b");
        let sprite = SpriteSpecifier::Texture("x.png".into());
        stack.add_layer(a.clone(), &sprite, 0);
        stack.add_layer(b.clone(), &sprite, 1);
        let _ = stack.commit();

        stack.remove_layer(&a);
        stack.add_layer(a.clone(), &sprite, 1);
        let changes = stack.commit();
        assert!(changes.reordered);
        assert!(changes.added.is_empty());

        stack.remove_layer(&b);
        let changes = stack.commit();
        assert_eq!(changes.removed, [b]);
        assert!(!changes.reordered);
    }
}
