// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for composition passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! composition and reconciliation call as they run. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Composition never fails on bad data. Instead, every piece it has to leave
//! out is reported as a [`SkipEvent`], so "silent" means non-fatal rather than
//! invisible.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`MarkingAppliedEvent`] and the
//!   corresponding `TraceSink` method.

#[cfg(feature = "trace-rich")]
use crate::layer::HumanoidLayer;
use crate::system::EntityId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What started a composition pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassTrigger {
    /// A character profile was loaded.
    Profile,
    /// A replicated state snapshot arrived.
    StateChange,
    /// A configuration flag changed.
    ConfigChange,
    /// The skin color was changed directly.
    SkinColor,
    /// A body-part layer was shown or hidden.
    LayerVisibility,
}

/// Why a piece of the appearance was left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The species id is not in the catalog.
    MissingSpecies,
    /// The species' sprite set is not in the catalog.
    MissingSpriteSet,
    /// A base sprite id is not in the catalog.
    MissingBaseSprite,
    /// A marking id is not in the catalog.
    MissingMarking,
    /// The marking's body part has no layer on the render surface.
    MissingTargetLayer,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Marks the beginning of a composition pass.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass: u64,
    /// Humanoid being composed.
    pub entity: EntityId,
    /// What started the pass.
    pub trigger: PassTrigger,
}

/// Marks the end of a composition pass.
#[derive(Clone, Copy, Debug)]
pub struct PassEndEvent {
    /// Pass counter.
    pub pass: u64,
    /// Humanoid that was composed.
    pub entity: EntityId,
    /// Counters collected during the pass.
    pub summary: PassSummary,
}

/// Emitted whenever a missing definition or layer is skipped.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent<'a> {
    /// Pass counter.
    pub pass: u64,
    /// Why the piece was skipped.
    pub reason: SkipReason,
    /// The id that could not be resolved.
    pub id: &'a str,
}

/// Emitted after one marking's sprites were placed on the surface.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct MarkingAppliedEvent<'a> {
    /// Pass counter.
    pub pass: u64,
    /// Marking id.
    pub marking: &'a str,
    /// Body part the marking is drawn over.
    pub body_part: HumanoidLayer,
    /// Whether the marking's layers ended up visible.
    pub visible: bool,
    /// Number of sprite layers placed.
    pub sprites: u32,
}

/// Per-pass counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass: u64,
    /// Markings whose layers were placed.
    pub markings_applied: u32,
    /// Marking layers taken off the surface before reapplication.
    pub layers_removed: u32,
    /// Base layers hidden because the species no longer declares them.
    pub stale_hidden: u32,
    /// Synthetic undergarment markings added.
    pub undergarments: u32,
    /// Pieces skipped because a definition or layer was missing.
    pub skips: u32,
}

impl PassSummary {
    /// Starts an empty summary for `pass`.
    #[must_use]
    pub const fn new(pass: u64) -> Self {
        Self {
            pass,
            markings_applied: 0,
            layers_removed: 0,
            stale_hidden: 0,
            undergarments: 0,
            skips: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from composition passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a pass finishes.
    fn on_pass_end(&mut self, e: &PassEndEvent) {
        _ = e;
    }

    /// Called when a piece of the appearance is skipped.
    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        _ = e;
    }

    /// Called per applied marking (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_marking_applied(&mut self, e: &MarkingAppliedEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassEndEvent`].
    #[inline]
    pub fn pass_end(&mut self, e: &PassEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MarkingAppliedEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn marking_applied(&mut self, e: &MarkingAppliedEvent<'_>) {
        if let Some(s) = &mut self.sink {
            s.on_marking_applied(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn skip() -> SkipEvent<'static> {
        SkipEvent {
            pass: 3,
            reason: SkipReason::MissingMarking,
            id: "Missing",
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_skip(&skip());
        sink.on_pass_end(&PassEndEvent {
            pass: 0,
            entity: EntityId::from_raw(0, 0),
            summary: PassSummary::default(),
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.skip(&skip());
    }

    #[test]
    fn summary_starts_empty() {
        let summary = PassSummary::new(9);
        assert_eq!(summary.pass, 9);
        assert_eq!(
            summary,
            PassSummary {
                pass: 9,
                ..PassSummary::default()
            }
        );
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::string::{String, ToString};
        use alloc::vec::Vec;

        struct RecordingSink {
            skipped: Vec<String>,
        }
        impl TraceSink for RecordingSink {
            fn on_skip(&mut self, e: &SkipEvent<'_>) {
                self.skipped.push(e.id.to_string());
            }
        }

        let mut sink = RecordingSink {
            skipped: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.skip(&skip());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.skipped, ["Missing"]);
    }
}
