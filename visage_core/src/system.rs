// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Humanoid registry and the entry points that trigger composition.
//!
//! [`AppearanceSystem`] owns every live humanoid's [`AppearanceState`] and
//! render surface, addressed by generational [`EntityId`] handles. It reacts
//! to three kinds of triggers:
//!
//! - **Replicated state** ([`handle_state`](AppearanceSystem::handle_state)):
//!   an authoritative snapshot replaces the state and the humanoid is fully
//!   recomposed.
//! - **Configuration** ([`poll_config`](AppearanceSystem::poll_config)): each
//!   change to a subscribed flag recomposes every humanoid once.
//! - **Direct operations**: profile loading, skin color, and layer
//!   visibility.
//!
//! Recomposition goes through the dirty tracker: triggers mark humanoids on a
//! [`dirty`] channel, and a flush drains the channels and runs one pass per
//! marked humanoid. Passes never fail; a humanoid with broken data still gets
//! composed as far as possible and never blocks the others.
//!
//! Entity handles follow the layer-handle rules: accessors panic on a stale
//! handle, while operations on a stale handle do nothing and return `false`.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::appearance::{AppearanceState, SlotFlags};
use crate::catalog::Catalog;
use crate::color::Color;
use crate::compose::{self, Pass};
use crate::config::{CLIENT_CENSOR_NUDITY, ConfigFlags, FlagChange, FlagKey, SERVER_CENSOR_NUDITY};
use crate::dirty;
use crate::layer::HumanoidLayer;
use crate::profile::CharacterProfile;
use crate::reconcile;
use crate::surface::RenderSurface;
use crate::trace::{NoopSink, PassTrigger, TraceSink, Tracer};

/// A handle to a humanoid in an [`AppearanceSystem`].
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a humanoid is despawned and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId {
    idx: u32,
    generation: u32,
}

impl EntityId {
    /// Builds a handle from raw parts (for diagnostics and tests).
    #[inline]
    #[must_use]
    pub const fn from_raw(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}@gen{})", self.idx, self.generation)
    }
}

/// Which side owns a humanoid's appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Authority {
    /// Created locally; profiles may be loaded into it.
    #[default]
    Client,
    /// Replicated from the server; only state snapshots may change it.
    Server,
}

#[derive(Debug)]
struct Humanoid<S> {
    state: AppearanceState,
    surface: S,
    authority: Authority,
}

/// Composes and reconciles the appearance of every live humanoid.
pub struct AppearanceSystem<C, S, T = NoopSink> {
    catalog: C,

    // -- Humanoid slots --
    slots: Vec<Option<Humanoid<S>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,

    // -- Triggers --
    dirty: DirtyTracker<u32>,
    config: ConfigFlags,
    subscriptions: BTreeSet<FlagKey>,

    // -- Diagnostics --
    passes: u64,
    sink: T,
}

impl<C: fmt::Debug, S, T> fmt::Debug for AppearanceSystem<C, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppearanceSystem")
            .field("catalog", &self.catalog)
            .field(
                "humanoids",
                &self.slots.iter().filter(|slot| slot.is_some()).count(),
            )
            .field("config", &self.config)
            .field("subscriptions", &self.subscriptions)
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

impl<C, S> AppearanceSystem<C, S, NoopSink>
where
    C: Catalog,
    S: RenderSurface,
{
    /// Creates an empty system that discards trace events.
    #[must_use]
    pub fn new(catalog: C) -> Self {
        Self::with_sink(catalog, NoopSink)
    }
}

impl<C, S, T> AppearanceSystem<C, S, T>
where
    C: Catalog,
    S: RenderSurface,
    T: TraceSink,
{
    /// Creates an empty system reporting to `sink`.
    ///
    /// Both nudity-censoring flags are subscribed.
    #[must_use]
    pub fn with_sink(catalog: C, sink: T) -> Self {
        let mut subscriptions = BTreeSet::new();
        subscriptions.insert(CLIENT_CENSOR_NUDITY);
        subscriptions.insert(SERVER_CENSOR_NUDITY);
        Self {
            catalog,
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            config: ConfigFlags::new(),
            subscriptions,
            passes: 0,
            sink,
        }
    }

    // -- Accessors --

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the catalog mutably. Changes take effect on the next pass.
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// Returns the configuration flags.
    #[must_use]
    pub fn config(&self) -> &ConfigFlags {
        &self.config
    }

    /// Returns the configuration flags mutably. Changes take effect on the
    /// next [`poll_config`](Self::poll_config).
    pub fn config_mut(&mut self) -> &mut ConfigFlags {
        &mut self.config
    }

    /// Returns the trace sink.
    #[must_use]
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Returns the trace sink mutably.
    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    /// Returns the number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Recomposes every humanoid when `key` changes.
    pub fn subscribe(&mut self, key: FlagKey) {
        self.subscriptions.insert(key);
    }

    /// Stops reacting to `key`.
    pub fn unsubscribe(&mut self, key: FlagKey) {
        self.subscriptions.remove(&key);
    }

    /// Returns the number of live humanoids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns whether no humanoid is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Returns whether `id` refers to a live humanoid.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        lookup(&self.slots, &self.generation, id).is_some()
    }

    /// Returns the handles of all live humanoids in slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (slot, _))| slot.is_some())
            .map(|(idx, (_, generation))| EntityId {
                idx: slot_index(idx),
                generation: *generation,
            })
    }

    /// Returns the appearance state of a live humanoid.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn state(&self, id: EntityId) -> &AppearanceState {
        &self.validate(id).state
    }

    /// Returns the render surface of a live humanoid.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn surface(&self, id: EntityId) -> &S {
        &self.validate(id).surface
    }

    /// Returns the render surface of a live humanoid mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn surface_mut(&mut self, id: EntityId) -> &mut S {
        let generation = self.current_generation(id);
        match lookup_mut(&mut self.slots, &self.generation, id) {
            Some(humanoid) => &mut humanoid.surface,
            None => panic!("stale EntityId: {id:?} (current gen: {generation})"),
        }
    }

    /// Returns who owns a live humanoid's appearance.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn authority(&self, id: EntityId) -> Authority {
        self.validate(id).authority
    }

    // -- Lifecycle --

    /// Adds a humanoid and composes it.
    pub fn spawn(&mut self, state: AppearanceState, surface: S, authority: Authority) -> EntityId {
        let humanoid = Humanoid {
            state,
            surface,
            authority,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.slots[idx as usize] = Some(humanoid);
            idx
        } else {
            let idx = slot_index(self.slots.len());
            self.slots.push(Some(humanoid));
            self.generation.push(0);
            idx
        };

        self.dirty.mark(idx, dirty::STATE);
        self.flush(PassTrigger::StateChange);
        EntityId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes a humanoid, handing back its state and surface.
    ///
    /// Returns `None` for a stale handle.
    pub fn despawn(&mut self, id: EntityId) -> Option<(AppearanceState, S)> {
        lookup(&self.slots, &self.generation, id)?;
        let humanoid = self.slots[id.idx as usize].take()?;
        self.dirty.remove_key(id.idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        Some((humanoid.state, humanoid.surface))
    }

    // -- Triggers --

    /// Replaces a humanoid's state with an authoritative snapshot and
    /// recomposes it.
    ///
    /// The snapshot is not a diff; everything replicated is overwritten.
    pub fn handle_state(&mut self, id: EntityId, incoming: AppearanceState) -> bool {
        let Some(humanoid) = lookup_mut(&mut self.slots, &self.generation, id) else {
            return false;
        };
        humanoid.state.replace_replicated(incoming);
        self.dirty.mark(id.idx, dirty::STATE);
        self.flush(PassTrigger::StateChange);
        true
    }

    /// Reacts to queued configuration changes. Returns the number of passes
    /// run.
    ///
    /// Each change to a subscribed flag recomposes every live humanoid
    /// exactly once.
    pub fn poll_config(&mut self) -> usize {
        let changes: Vec<FlagChange> = self.config.drain_changes().collect();
        let mut passes = 0;
        for change in changes {
            if !self.subscriptions.contains(&change.key) {
                continue;
            }
            for (idx, slot) in self.slots.iter().enumerate() {
                if slot.is_some() {
                    self.dirty.mark(slot_index(idx), dirty::CONFIG);
                }
            }
            passes += self.flush(PassTrigger::ConfigChange);
        }
        passes
    }

    /// Loads a character profile into a client-owned humanoid and recomposes
    /// it. Does nothing for `None`.
    ///
    /// Equipment hiding, permanent hiding, and custom base layers are reset.
    /// Loading into a server-owned humanoid is a caller bug: the next
    /// replicated snapshot would overwrite it.
    pub fn load_profile(&mut self, id: EntityId, profile: Option<&CharacterProfile>) -> bool {
        let Some(profile) = profile else {
            return false;
        };
        let Some(humanoid) = lookup_mut(&mut self.slots, &self.generation, id) else {
            return false;
        };
        debug_assert_eq!(
            humanoid.authority,
            Authority::Client,
            "profile loaded into server-authoritative {id:?}"
        );
        profile.apply_to(&mut humanoid.state, &self.catalog);
        self.dirty.mark(id.idx, dirty::STATE);
        self.flush(PassTrigger::Profile);
        true
    }

    /// Changes a humanoid's skin color and retints its skin-matched layers.
    ///
    /// Returns `false` when the color is unchanged. Layers that do not match
    /// skin, including custom overrides, keep their colors.
    pub fn set_skin_color(&mut self, id: EntityId, color: Color) -> bool {
        let Some(humanoid) = lookup_mut(&mut self.slots, &self.generation, id) else {
            return false;
        };
        if humanoid.state.skin_color == color {
            return false;
        }
        humanoid.state.skin_color = color;

        self.passes += 1;
        let pass = Pass::begin(
            Tracer::new(&mut self.sink),
            self.passes,
            id,
            PassTrigger::SkinColor,
        );
        compose::apply_skin_color(&humanoid.state, &mut humanoid.surface);
        pass.end();
        true
    }

    /// Shows or hides a body-part layer, optionally on behalf of an equipment
    /// slot. Returns whether the replicated hidden map changed.
    ///
    /// The surface follows the layer's resulting visibility; a layer still
    /// covered by another slot stays hidden. When the surface visibility
    /// actually flips, the markings drawn over that body part are reapplied.
    pub fn set_layer_visibility(
        &mut self,
        id: EntityId,
        layer: HumanoidLayer,
        visible: bool,
        slot: Option<SlotFlags>,
    ) -> bool {
        let Some(humanoid) = lookup_mut(&mut self.slots, &self.generation, id) else {
            return false;
        };
        let changed = humanoid.state.set_layer_hidden_by(layer, visible, slot);
        let shown = !humanoid.state.is_hidden(layer);
        if !reconcile::set_base_visible(&mut humanoid.surface, layer, shown) {
            return changed;
        }

        self.passes += 1;
        let mut pass = Pass::begin(
            Tracer::new(&mut self.sink),
            self.passes,
            id,
            PassTrigger::LayerVisibility,
        );
        reconcile::reapply_body_part(
            &humanoid.state,
            &mut humanoid.surface,
            &self.catalog,
            layer,
            &mut pass,
        );
        pass.end();
        changed
    }

    // -- Internal helpers --

    /// Drains both dirty channels and composes each marked humanoid once.
    fn flush(&mut self, trigger: PassTrigger) -> usize {
        let mut keys: Vec<u32> = self
            .dirty
            .drain(dirty::STATE)
            .deterministic()
            .run()
            .collect();
        keys.extend(self.dirty.drain(dirty::CONFIG).deterministic().run());
        keys.sort_unstable();
        keys.dedup();

        let censor = self.config.censor_nudity();
        let mut passes = 0;
        for idx in keys {
            let Some(humanoid) = self.slots.get_mut(idx as usize).and_then(Option::as_mut) else {
                continue;
            };
            let entity = EntityId {
                idx,
                generation: self.generation[idx as usize],
            };
            self.passes += 1;
            let mut pass = Pass::begin(Tracer::new(&mut self.sink), self.passes, entity, trigger);
            compose::update_sprite(
                &mut humanoid.state,
                &mut humanoid.surface,
                &self.catalog,
                censor,
                &mut pass,
            );
            pass.end();
            passes += 1;
        }
        passes
    }

    fn current_generation(&self, id: EntityId) -> u32 {
        self.generation
            .get(id.idx as usize)
            .copied()
            .unwrap_or(u32::MAX)
    }

    /// Panics if the handle is stale.
    fn validate(&self, id: EntityId) -> &Humanoid<S> {
        match lookup(&self.slots, &self.generation, id) {
            Some(humanoid) => humanoid,
            None => panic!(
                "stale EntityId: {id:?} (current gen: {})",
                self.current_generation(id)
            ),
        }
    }
}

fn slot_index(idx: usize) -> u32 {
    u32::try_from(idx).unwrap_or(crate::layer::INVALID)
}

fn lookup<'a, S>(
    slots: &'a [Option<Humanoid<S>>],
    generation: &[u32],
    id: EntityId,
) -> Option<&'a Humanoid<S>> {
    if generation.get(id.idx as usize) != Some(&id.generation) {
        return None;
    }
    slots.get(id.idx as usize)?.as_ref()
}

fn lookup_mut<'a, S>(
    slots: &'a mut [Option<Humanoid<S>>],
    generation: &[u32],
    id: EntityId,
) -> Option<&'a mut Humanoid<S>> {
    if generation.get(id.idx as usize) != Some(&id.generation) {
        return None;
    }
    slots.get_mut(id.idx as usize)?.as_mut()
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::layer::{LayerKey, LayerStack};
    use crate::marking::{Marking, MarkingCategory};
    use crate::test_support::{self, DARK, HUMAN, LIZARD, RED, SKIN};

    type System = AppearanceSystem<MemoryCatalog, LayerStack>;

    fn system() -> System {
        AppearanceSystem::new(test_support::catalog())
    }

    fn human() -> AppearanceState {
        let mut state = AppearanceState::new(HUMAN);
        state.skin_color = SKIN;
        state.undergarment_top = Some(String::from("Bra"));
        state
    }

    fn profile() -> CharacterProfile {
        let mut profile = CharacterProfile::new(HUMAN);
        profile.appearance.skin_color = SKIN;
        profile.appearance.eye_color = DARK;
        profile.appearance.hair_style_id = String::from("Bob");
        profile.appearance.hair_color = RED;
        profile.appearance.markings = vec![
            Marking::new("StripeAccent", vec![]),
            Marking::new("ChestTattoo", vec![RED]),
        ];
        profile
    }

    #[test]
    fn spawn_composes_immediately() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        assert!(system.is_alive(id));
        assert_eq!(system.passes(), 1);
        let stack = system.surface(id);
        assert_eq!(
            stack.color(&LayerKey::Identifier(HumanoidLayer::Chest)),
            Some(SKIN)
        );
        assert_eq!(system.state(id).base_layers().len(), 8);
    }

    #[test]
    fn load_profile_composes_markings() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        assert!(!system.load_profile(id, None));
        assert!(system.load_profile(id, Some(&profile())));

        let stack = system.surface(id);
        assert_eq!(stack.color(&LayerKey::derived("Bob", "bob")), Some(RED));
        assert_eq!(
            stack.color(&LayerKey::derived("StripeAccent", "stripes")),
            Some(RED)
        );
        assert!(stack.lookup(&LayerKey::derived("Briefs", "briefs")).is_some());
        assert_eq!(system.state(id).applied_markings().len(), 4);
    }

    #[test]
    fn repeated_load_converges() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        system.load_profile(id, Some(&profile()));
        let _ = system.surface_mut(id).commit();
        system.load_profile(id, Some(&profile()));
        assert!(system.surface_mut(id).commit().is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "server-authoritative")]
    fn load_profile_on_server_entity_asserts() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Server);
        system.load_profile(id, Some(&profile()));
    }

    #[test]
    fn handle_state_replaces_and_recomposes() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Server);

        let mut incoming = AppearanceState::new(LIZARD);
        incoming.skin_color = DARK;
        assert!(
            incoming
                .markings
                .add_back(MarkingCategory::Tail, Marking::new("LizardTail", vec![RED]))
        );
        assert!(system.handle_state(id, incoming));

        let stack = system.surface(id);
        assert_eq!(
            stack.color(&LayerKey::derived("LizardTail", "tail_smooth")),
            Some(RED)
        );
        assert_eq!(system.state(id).species, LIZARD);
        assert_eq!(system.state(id).undergarment_top, None);
    }

    #[test]
    fn config_change_recomposes_every_humanoid_once() {
        let mut system = system();
        let a = system.spawn(human(), LayerStack::new(), Authority::Client);
        let b = system.spawn(human(), LayerStack::new(), Authority::Server);
        let bra = LayerKey::derived("Bra", "bra");

        system.config_mut().set(CLIENT_CENSOR_NUDITY, true);
        // The server flag is already off, so this is not a change.
        system.config_mut().set(SERVER_CENSOR_NUDITY, false);
        assert_eq!(system.poll_config(), 2);
        assert!(system.surface(a).lookup(&bra).is_some());
        assert!(system.surface(b).lookup(&bra).is_some());

        system.config_mut().set(CLIENT_CENSOR_NUDITY, false);
        assert_eq!(system.poll_config(), 2);
        assert!(system.surface(a).lookup(&bra).is_none());
        assert!(system.surface(b).lookup(&bra).is_none());
        assert_eq!(system.poll_config(), 0);
    }

    #[test]
    fn unsubscribed_flags_are_ignored() {
        let mut system = system();
        system.spawn(human(), LayerStack::new(), Authority::Client);
        let custom = FlagKey::new("custom.flag");
        system.config_mut().set(custom, true);
        assert_eq!(system.poll_config(), 0);

        system.subscribe(custom);
        system.config_mut().set(custom, false);
        assert_eq!(system.poll_config(), 1);

        system.unsubscribe(CLIENT_CENSOR_NUDITY);
        system.config_mut().set(CLIENT_CENSOR_NUDITY, true);
        assert_eq!(system.poll_config(), 0);
    }

    #[test]
    fn broken_humanoid_does_not_block_others() {
        let mut system = system();
        let broken = system.spawn(
            AppearanceState::new("Unknown"),
            LayerStack::new(),
            Authority::Client,
        );
        let fine = system.spawn(human(), LayerStack::new(), Authority::Client);
        system.config_mut().set(SERVER_CENSOR_NUDITY, true);
        assert_eq!(system.poll_config(), 2);
        assert!(
            system
                .surface(fine)
                .lookup(&LayerKey::derived("Bra", "bra"))
                .is_some()
        );
        assert_eq!(system.surface(broken).len(), 1, "only the eyes slot");
    }

    #[test]
    fn skin_color_retints_only_on_change() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        let passes = system.passes();
        assert!(!system.set_skin_color(id, SKIN));
        assert_eq!(system.passes(), passes);

        assert!(system.set_skin_color(id, DARK));
        let stack = system.surface(id);
        assert_eq!(
            stack.color(&LayerKey::Identifier(HumanoidLayer::Chest)),
            Some(DARK)
        );
        assert_eq!(
            stack.color(&LayerKey::Identifier(HumanoidLayer::Hair)),
            Some(Color::WHITE)
        );
    }

    #[test]
    fn layer_visibility_follows_slot_masks() {
        let mut system = system();
        let mut state = human();
        assert!(
            state
                .markings
                .add_back(MarkingCategory::Hair, Marking::new("Bob", vec![DARK]))
        );
        let id = system.spawn(state, LayerStack::new(), Authority::Client);
        let hair = LayerKey::Identifier(HumanoidLayer::Hair);
        let bob = LayerKey::derived("Bob", "bob");

        assert!(system.set_layer_visibility(id, HumanoidLayer::Hair, false, Some(SlotFlags::HEAD)));
        assert!(system.set_layer_visibility(id, HumanoidLayer::Hair, false, Some(SlotFlags::MASK)));
        assert_eq!(system.surface(id).is_visible(&hair), Some(false));
        assert_eq!(system.surface(id).is_visible(&bob), Some(false));

        // The mask still covers the hair.
        assert!(system.set_layer_visibility(id, HumanoidLayer::Hair, true, Some(SlotFlags::HEAD)));
        assert_eq!(system.surface(id).is_visible(&bob), Some(false));

        assert!(system.set_layer_visibility(id, HumanoidLayer::Hair, true, Some(SlotFlags::MASK)));
        assert_eq!(system.surface(id).is_visible(&hair), Some(true));
        assert_eq!(system.surface(id).is_visible(&bob), Some(true));
        assert_eq!(system.surface(id).color(&bob), Some(DARK));

        assert!(!system.set_layer_visibility(id, HumanoidLayer::Hair, true, None));
    }

    #[test]
    fn despawn_invalidates_handle() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        let (state, stack) = system.despawn(id).unwrap();
        assert_eq!(state.species, HUMAN);
        assert!(!stack.is_empty());
        assert!(!system.is_alive(id));
        assert!(system.despawn(id).is_none());
        assert!(!system.set_skin_color(id, RED));
        assert!(system.is_empty());

        let reused = system.spawn(human(), LayerStack::new(), Authority::Client);
        assert_eq!(reused.index(), id.index());
        assert_ne!(reused.generation(), id.generation());
        assert_eq!(system.entities().collect::<Vec<_>>(), [reused]);
    }

    #[test]
    #[should_panic(expected = "stale EntityId")]
    fn stale_handle_panics_on_state() {
        let mut system = system();
        let id = system.spawn(human(), LayerStack::new(), Authority::Client);
        system.despawn(id);
        let _ = system.state(id);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn passes_are_traced() {
        use crate::trace::{PassBeginEvent, PassEndEvent, SkipEvent, SkipReason};

        #[derive(Default)]
        struct Counts {
            begins: Vec<PassTrigger>,
            ends: u32,
            skips: Vec<SkipReason>,
        }
        impl TraceSink for Counts {
            fn on_pass_begin(&mut self, e: &PassBeginEvent) {
                self.begins.push(e.trigger);
            }
            fn on_pass_end(&mut self, _: &PassEndEvent) {
                self.ends += 1;
            }
            fn on_skip(&mut self, e: &SkipEvent<'_>) {
                self.skips.push(e.reason);
            }
        }

        let mut system = AppearanceSystem::with_sink(test_support::catalog(), Counts::default());
        let mut state = human();
        state
            .markings
            .add_back(MarkingCategory::Special, Marking::new("Missing", vec![]));
        let id = system.spawn(state, LayerStack::new(), Authority::Client);
        system.set_skin_color(id, DARK);

        let sink = system.sink();
        assert_eq!(sink.begins, [PassTrigger::StateChange, PassTrigger::SkinColor]);
        assert_eq!(sink.ends, 2);
        assert_eq!(sink.skips, [SkipReason::MissingMarking]);
    }
}
