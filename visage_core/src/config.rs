// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named boolean configuration flags with change notification.
//!
//! Flags are read on demand by composition. Setting a flag to a different
//! value queues a [`FlagChange`]; consumers drain the queue and react to the
//! keys they subscribed to. A change is queued once per actual transition, so
//! setting a flag to its current value is free.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

/// Name of a boolean flag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlagKey(&'static str);

impl FlagKey {
    /// Creates a key from its name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the flag name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlagKey({})", self.0)
    }
}

/// Player preference for drawing undergarments on otherwise bare bodies.
pub const CLIENT_CENSOR_NUDITY: FlagKey = FlagKey::new("accessibility.censor_nudity");

/// Server-wide enforcement of [`CLIENT_CENSOR_NUDITY`].
pub const SERVER_CENSOR_NUDITY: FlagKey = FlagKey::new("accessibility.server_censor_nudity");

/// A flag transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagChange {
    /// Which flag changed.
    pub key: FlagKey,
    /// Its new value.
    pub value: bool,
}

/// A store of boolean flags.
///
/// Unregistered flags read as `false`.
#[derive(Clone, Debug)]
pub struct ConfigFlags {
    values: BTreeMap<FlagKey, bool>,
    pending: Vec<FlagChange>,
}

impl Default for ConfigFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFlags {
    /// Creates a store with the censoring flags registered and off.
    #[must_use]
    pub fn new() -> Self {
        let mut flags = Self {
            values: BTreeMap::new(),
            pending: Vec::new(),
        };
        flags.register(CLIENT_CENSOR_NUDITY, false);
        flags.register(SERVER_CENSOR_NUDITY, false);
        flags
    }

    /// Registers `key` with a default value. Already registered keys keep
    /// their current value.
    pub fn register(&mut self, key: FlagKey, default: bool) {
        self.values.entry(key).or_insert(default);
    }

    /// Returns the value of `key`.
    #[must_use]
    pub fn get(&self, key: FlagKey) -> bool {
        self.values.get(&key).copied().unwrap_or(false)
    }

    /// Sets `key`, registering it if needed. Returns whether the value
    /// changed; only changes are queued.
    pub fn set(&mut self, key: FlagKey, value: bool) -> bool {
        let old = self.values.insert(key, value).unwrap_or(false);
        if old == value {
            return false;
        }
        self.pending.push(FlagChange { key, value });
        true
    }

    /// Returns whether changes are waiting to be drained.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains queued changes in the order they happened.
    pub fn drain_changes(&mut self) -> impl Iterator<Item = FlagChange> + '_ {
        self.pending.drain(..)
    }

    /// Returns whether nudity is censored by either the player or the server.
    #[must_use]
    pub fn censor_nudity(&self) -> bool {
        self.get(CLIENT_CENSOR_NUDITY) || self.get(SERVER_CENSOR_NUDITY)
    }
}
