//! Conversion observers.
//!
//! The engine reports its decisions through an injected observer instead
//! of writing logs itself. [`TracingObserver`] forwards everything to
//! `tracing`; [`NoopObserver`] discards it.

use lanecast_chart::{ObjectKind, SourceObject};
use tracing::{debug, trace};

use crate::convert::ConversionSummary;
use crate::difficulty::ConversionParams;
use crate::pattern::hold::HoldStrategy;
use crate::pattern::tap::TapStrategy;
use crate::pattern::{LaneGroup, PatternFlags};

/// Target used for all engine events.
pub const TRACE_TARGET: &str = "lanecast::convert";

/// Receives conversion events. Every method defaults to doing nothing.
pub trait ConversionObserver {
    /// Parameters have been derived; no object has been converted yet.
    fn on_start(&mut self, _params: &ConversionParams) {}

    /// A tap point was classified.
    fn on_tap(&mut self, _obj: &SourceObject, _flags: PatternFlags, _strategy: &TapStrategy) {}

    /// A hold span strategy was chosen.
    fn on_hold(&mut self, _obj: &SourceObject, _flags: PatternFlags, _strategy: &HoldStrategy) {}

    /// A group of notes was emitted for an object.
    fn on_group(&mut self, _kind: ObjectKind, _group: &LaneGroup) {}

    /// Conversion finished.
    fn on_finish(&mut self, _summary: &ConversionSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Observer that emits structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ConversionObserver for TracingObserver {
    fn on_start(&mut self, params: &ConversionParams) {
        debug!(
            target: TRACE_TARGET,
            seed = params.seed,
            lanes = params.lane_count,
            auto_lanes = params.auto_lanes,
            difficulty = params.conversion_difficulty,
            random_start = params.random_start,
            "conversion started"
        );
    }

    fn on_tap(&mut self, obj: &SourceObject, flags: PatternFlags, strategy: &TapStrategy) {
        trace!(
            target: TRACE_TARGET,
            time = obj.time,
            flags = ?flags.names(),
            strategy = strategy.name(),
            "tap point"
        );
    }

    fn on_hold(&mut self, obj: &SourceObject, flags: PatternFlags, strategy: &HoldStrategy) {
        trace!(
            target: TRACE_TARGET,
            time = obj.time,
            end_time = obj.end_time,
            spans = obj.span_count,
            flags = ?flags.names(),
            strategy = strategy.name(),
            "hold span"
        );
    }

    fn on_group(&mut self, kind: ObjectKind, group: &LaneGroup) {
        let lanes: Vec<usize> = group.notes().iter().map(|n| n.lane).collect();
        trace!(target: TRACE_TARGET, kind = kind.as_str(), lanes = ?lanes, "group emitted");
    }

    fn on_finish(&mut self, summary: &ConversionSummary) {
        debug!(
            target: TRACE_TARGET,
            notes = summary.note_count,
            holds = summary.hold_count,
            passthrough = summary.passthrough,
            "conversion finished"
        );
    }
}
