// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! [`AppearanceSystem`](crate::system::AppearanceSystem) tracks which
//! humanoids need recomposition with [`understory_dirty`], keyed by entity
//! slot. Both channels are local-only: humanoids do not depend on each other,
//! so marking one never marks another.
//!
//! # Consumption
//!
//! Every flush drains both channels, merges and deduplicates the keys, and
//! recomposes each humanoid exactly once, in slot order. A humanoid marked on
//! both channels still gets a single pass.

use understory_dirty::Channel;

/// Replicated or locally loaded appearance state changed.
pub const STATE: Channel = Channel::new(0);

/// A subscribed configuration flag changed; every humanoid is marked.
pub const CONFIG: Channel = Channel::new(1);
