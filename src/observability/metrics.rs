//! Engine metrics.
//!
//! Recorded through the `metrics` facade. The crate installs no recorder or
//! exporter; a host that wants numbers installs its own recorder and every
//! call below becomes live.

use metrics::{counter, describe_counter, describe_gauge, gauge};

use crate::engine::ModeKind;

/// What kind of change a frame carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A character reveal or removal.
    Char,
    /// A caret visibility change with no text change.
    Caret,
}

impl FrameKind {
    /// Label value for the `kind` label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Caret => "caret",
        }
    }
}

/// Registers metric descriptions with the global recorder.
pub fn describe_metrics() {
    describe_counter!(
        "typewriter_frames_total",
        "Frames delivered to render sinks, by kind"
    );
    describe_counter!(
        "typewriter_mode_transitions_total",
        "Mode transitions, by target mode"
    );
    describe_counter!(
        "typewriter_cycles_total",
        "Completed traversals of a phrase list"
    );
    describe_gauge!("typewriter_engines_active", "Engines currently running");
}

/// Records one delivered frame.
pub fn record_frame(kind: FrameKind) {
    counter!("typewriter_frames_total", "kind" => kind.label()).increment(1);
}

/// Records a mode transition.
///
/// Labels come from the closed [`ModeKind`] set, so cardinality is fixed.
pub fn record_mode_transition(to: ModeKind) {
    counter!("typewriter_mode_transitions_total", "to" => to.as_str()).increment(1);
}

/// Records a completed cycle.
pub fn record_cycle() {
    counter!("typewriter_cycles_total").increment(1);
}

/// Adjusts the active engine gauge.
pub fn engine_started() {
    gauge!("typewriter_engines_active").increment(1.0);
}

/// Adjusts the active engine gauge.
pub fn engine_stopped() {
    gauge!("typewriter_engines_active").decrement(1.0);
}
