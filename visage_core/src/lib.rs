// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Appearance composition and layer reconciliation for customizable humanoids.
//!
//! `visage_core` turns a humanoid's appearance state (species, sex, skin and
//! eye color, hidden layers, markings) into an ordered stack of sprite layers.
//! It is `no_std` compatible (with `alloc`) and talks to the renderer only
//! through the [`RenderSurface`](surface::RenderSurface) trait.
//!
//! # Architecture
//!
//! Triggers mark humanoids dirty; a flush runs one composition pass per
//! marked humanoid:
//!
//! ```text
//!   CharacterProfile ──► load_profile ──┐
//!   AppearanceState  ──► handle_state ──┤
//!   ConfigFlags      ──► poll_config ───┤
//!                                       ▼
//!                          DirtyTracker (STATE, CONFIG)
//!                                       │
//!                                       ▼
//!   Catalog ──► update_sprite: base layers ─► markings ─► scale ─► eyes
//!                                       │
//!                                       ▼
//!                      RenderSurface (LayerStack::commit ─► SurfaceChanges)
//! ```
//!
//! **[`system`]** — [`AppearanceSystem`](system::AppearanceSystem): the
//! humanoid registry with generational [`EntityId`](system::EntityId)
//! handles, and the entry points that trigger composition.
//!
//! **[`appearance`]** — [`AppearanceState`](appearance::AppearanceState), the
//! replicated per-humanoid data, plus equipment slot masks.
//!
//! **[`profile`]** — Character profiles and their resolution into a
//! [`MarkingSet`](marking::MarkingSet).
//!
//! **[`marking`]** — Markings, capacity-limited marking sets, and coloring
//! rules.
//!
//! **[`catalog`]** — The read-only [`Catalog`](catalog::Catalog) of species,
//! sprite sets, base sprites, and marking definitions.
//!
//! **[`layer`]** — Layer keys and [`LayerStack`](layer::LayerStack), the
//! in-memory render surface with net change reporting.
//!
//! **[`config`]** — Named boolean flags with change notification.
//!
//! **[`dirty`]** — Dirty-tracking channels via `understory_dirty`.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! composition passes, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-marking
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod appearance;
pub mod catalog;
pub mod color;
pub mod config;
pub mod dirty;
pub mod layer;
pub mod marking;
pub mod profile;
pub mod surface;
pub mod system;
pub mod trace;

mod compose;
mod reconcile;

#[cfg(test)]
mod test_support;

pub use compose::composed_scale;
