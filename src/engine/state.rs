//! Engine state representation.
//!
//! The mode is a single tagged enum; each variant carries only the data that
//! mode needs, so combinations like "deleting while paused" cannot be
//! expressed.

use serde::Serialize;

/// The current phase of the animation for the active phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Revealing characters; `cursor` are currently visible.
    Typing {
        /// Visible characters, strictly less than the phrase length.
        cursor: usize,
    },
    /// Full phrase visible, caret blinking.
    Paused,
    /// Removing characters; `cursor` are currently visible.
    Deleting {
        /// Visible characters, at least one.
        cursor: usize,
    },
    /// Finite cycle exhausted. Terminal.
    Done,
}

impl Mode {
    /// The data-less discriminant of this mode.
    #[must_use]
    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Typing { .. } => ModeKind::Typing,
            Self::Paused => ModeKind::Paused,
            Self::Deleting { .. } => ModeKind::Deleting,
            Self::Done => ModeKind::Done,
        }
    }
}

/// Mode discriminant used for logging, metrics labels, and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    /// See [`Mode::Typing`].
    Typing,
    /// See [`Mode::Paused`].
    Paused,
    /// See [`Mode::Deleting`].
    Deleting,
    /// See [`Mode::Done`].
    Done,
}

impl ModeKind {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Paused => "paused",
            Self::Deleting => "deleting",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the render sink receives on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Currently visible prefix of the active phrase.
    pub text: String,
    /// Whether the caret glyph should be drawn.
    pub caret_visible: bool,
}

impl Frame {
    /// Creates a frame.
    #[must_use]
    pub fn new(text: impl Into<String>, caret_visible: bool) -> Self {
        Self {
            text: text.into(),
            caret_visible,
        }
    }
}

/// Point-in-time view of a running engine, published after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Index of the phrase being typed or deleted.
    pub phrase_index: usize,
    /// Current mode.
    pub mode: Mode,
    /// Current caret visibility.
    pub caret_visible: bool,
    /// Completed traversals of the phrase list.
    pub cycles: u64,
}
