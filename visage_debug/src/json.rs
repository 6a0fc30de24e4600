// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event recording and export.
//!
//! [`JsonRecorder`] implements [`TraceSink`] and buffers every event as a
//! [`serde_json::Value`] object. [`export`](JsonRecorder::export) writes the
//! buffer as one JSON array, suitable for diffing two runs or feeding into
//! other tooling.
//!
//! Every object carries `"event"` (the event kind) and `"pass"` (the pass
//! counter); the remaining fields depend on the kind.

use std::io::{self, Write};

use serde_json::{Value, json};

use visage_core::system::EntityId;
use visage_core::trace::{
    MarkingAppliedEvent, PassBeginEvent, PassEndEvent, SkipEvent, TraceSink,
};

/// A [`TraceSink`] that buffers events as JSON objects.
#[derive(Debug, Default)]
pub struct JsonRecorder {
    events: Vec<Value>,
}

impl JsonRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in arrival order.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the recorded events as a pretty-printed JSON array.
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    /// Consumes the recorder and returns the events as one JSON array.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Array(self.events)
    }
}

fn entity(id: EntityId) -> Value {
    json!({
        "index": id.index(),
        "generation": id.generation(),
    })
}

impl TraceSink for JsonRecorder {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.events.push(json!({
            "event": "pass_begin",
            "pass": e.pass,
            "entity": entity(e.entity),
            "trigger": format!("{:?}", e.trigger),
        }));
    }

    fn on_pass_end(&mut self, e: &PassEndEvent) {
        let s = &e.summary;
        self.events.push(json!({
            "event": "pass_end",
            "pass": e.pass,
            "entity": entity(e.entity),
            "summary": {
                "markings_applied": s.markings_applied,
                "layers_removed": s.layers_removed,
                "stale_hidden": s.stale_hidden,
                "undergarments": s.undergarments,
                "skips": s.skips,
            }
        }));
    }

    fn on_skip(&mut self, e: &SkipEvent<'_>) {
        self.events.push(json!({
            "event": "skip",
            "pass": e.pass,
            "reason": format!("{:?}", e.reason),
            "id": e.id,
        }));
    }

    fn on_marking_applied(&mut self, e: &MarkingAppliedEvent<'_>) {
        self.events.push(json!({
            "event": "marking_applied",
            "pass": e.pass,
            "marking": e.marking,
            "body_part": format!("{:?}", e.body_part),
            "visible": e.visible,
            "sprites": e.sprites,
        }));
    }
}
