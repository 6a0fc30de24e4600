// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer identity and the in-memory layer stack.
//!
//! A humanoid is drawn as an ordered stack of sprite layers. Each layer is
//! registered under a [`LayerKey`]:
//!
//! - **Base layers** use [`LayerKey::Identifier`] with a [`HumanoidLayer`]
//!   body-part slot. Their sprites come from the species sprite set or from a
//!   custom override.
//! - **Marking layers** use [`LayerKey::Derived`], built from the marking id
//!   and the sprite state, and sit directly above their body part's base
//!   layer.
//!
//! [`LayerStack`] implements [`RenderSurface`](crate::surface::RenderSurface)
//! in memory. It stores layers in struct-of-arrays layout with generational
//! [`LayerHandle`]s and reports net [`SurfaceChanges`] on
//! [`commit`](LayerStack::commit).

mod changes;
mod id;
mod sprite;
mod stack;

pub use changes::SurfaceChanges;
pub use id::{HumanoidLayer, INVALID, LayerHandle, LayerKey};
pub use sprite::SpriteSpecifier;
pub use stack::LayerStack;
