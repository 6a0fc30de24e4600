// Copyright 2026 the Visage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON export for visage composition traces.
//!
//! This crate provides [`TraceSink`](visage_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`] — human-readable one-line-per-event output.
//! - [`json::JsonRecorder`] — buffers events as JSON objects and exports them
//!   as a single JSON array.
//!
//! Either sink can be handed to
//! [`AppearanceSystem::with_sink`](visage_core::system::AppearanceSystem::with_sink)
//! and read back through
//! [`sink`](visage_core::system::AppearanceSystem::sink).

pub mod json;
pub mod pretty;
