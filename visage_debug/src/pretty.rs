// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use visage_core::trace::{
    MarkingAppliedEvent, PassBeginEvent, PassEndEvent, PassTrigger, SkipEvent, SkipReason,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn trigger_name(trigger: PassTrigger) -> &'static str {
    match trigger {
        PassTrigger::Profile => "profile",
        PassTrigger::StateChange => "state",
        PassTrigger::ConfigChange => "config",
        PassTrigger::SkinColor => "skin",
        PassTrigger::LayerVisibility => "visibility",
    }
}

fn reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::MissingSpecies => "species",
        SkipReason::MissingSpriteSet => "sprite-set",
        SkipReason::MissingBaseSprite => "base-sprite",
        SkipReason::MissingMarking => "marking",
        SkipReason::MissingTargetLayer => "target-layer",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} entity={:?} trigger={}",
            e.pass,
            e.entity,
            trigger_name(e.trigger),
        );
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let s = &e.summary;
        let _ = writeln!(
            self.writer,
            "[pass:end] pass={} entity={:?} markings={} removed={} stale={} \
             undergarments={} skips={}",
            e.pass,
            e.entity,
            s.markings_applied,
            s.layers_removed,
            s.stale_hidden,
            s.undergarments,
            s.skips,
        );
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        let _ = writeln!(
            self.writer,
            "[skip] pass={} missing {} \"{}\"",
            e.pass,
            reason_name(e.reason),
            e.id,
        );
    }

    fn on_marking_applied(&mut self, e: &MarkingAppliedEvent<'_>) {
        let shown = if e.visible { "shown" } else { "hidden" };
        let _ = writeln!(
            self.writer,
            "[marking] pass={} {} on {:?} sprites={} {shown}",
            e.pass, e.marking, e.body_part, e.sprites,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visage_core::layer::HumanoidLayer;
    use visage_core::system::EntityId;
    use visage_core::trace::PassSummary;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_pass() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let entity = EntityId::from_raw(3, 1);
        sink.on_pass_begin(&PassBeginEvent {
            pass: 7,
            entity,
            trigger: PassTrigger::ConfigChange,
        });
        let mut summary = PassSummary::new(7);
        summary.undergarments = 2;
        sink.on_pass_end(&PassEndEvent {
            pass: 7,
            entity,
            summary,
        });
        let output = output(sink);
        assert!(output.contains("[pass:begin] pass=7"), "got: {output}");
        assert!(output.contains("EntityId(3@gen1)"), "got: {output}");
        assert!(output.contains("trigger=config"), "got: {output}");
        assert!(output.contains("undergarments=2"), "got: {output}");
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn pretty_print_skip_and_marking() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_skip(&SkipEvent {
            pass: 1,
            reason: SkipReason::MissingMarking,
            id: "LongHair",
        });
        sink.on_marking_applied(&MarkingAppliedEvent {
            pass: 1,
            marking: "TribalArm",
            body_part: HumanoidLayer::LArm,
            visible: false,
            sprites: 3,
        });
        let output = output(sink);
        assert!(
            output.contains("[skip] pass=1 missing marking \"LongHair\""),
            "got: {output}"
        );
        assert!(
            output.contains("[marking] pass=1 TribalArm on LArm sprites=3 hidden"),
            "got: {output}"
        );
    }
}
