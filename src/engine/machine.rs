//! Sans-IO typewriter state machine.
//!
//! [`Typewriter`] owns the phrase list, the mode, and the caret. It knows
//! nothing about clocks: the driver calls [`Typewriter::advance`] when the
//! character timer fires and [`Typewriter::toggle_caret`] when the blink
//! timer fires, and schedules the next wakeups from what they return.

use std::time::Duration;

use super::phrases::PhraseList;
use super::state::{Frame, Mode, ModeKind, Snapshot};
use super::timing::TypewriterConfig;

/// Outcome of one character-timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Frame to emit, if anything visible changed.
    pub frame: Option<Frame>,
    /// Delay until the next character-timer tick. `None` once `Done`.
    pub next_in: Option<Duration>,
    /// Mode before the tick.
    pub from: ModeKind,
    /// Mode after the tick.
    pub to: ModeKind,
    /// A full traversal of the phrase list finished on this tick.
    pub cycle_completed: bool,
}

impl Transition {
    /// Whether this tick changed the mode.
    #[must_use]
    pub fn mode_changed(&self) -> bool {
        self.from != self.to
    }
}

/// The typewriter state machine for one engine instance.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: PhraseList,
    config: TypewriterConfig,
    phrase_index: usize,
    mode: Mode,
    caret_visible: bool,
    cycles: u64,
}

impl Typewriter {
    /// Creates a machine at phrase 0, typing from an empty prefix.
    ///
    /// An empty first phrase has nothing to reveal and starts `Paused`.
    #[must_use]
    pub fn new(phrases: PhraseList, config: TypewriterConfig) -> Self {
        let mut machine = Self {
            phrases,
            config,
            phrase_index: 0,
            mode: Mode::Typing { cursor: 0 },
            caret_visible: true,
            cycles: 0,
        };
        machine.enter_typing();
        machine
    }

    /// Applies one character-timer tick.
    pub fn advance(&mut self) -> Transition {
        let from = self.mode.kind();
        let mut frame = None;
        let mut cycle_completed = false;

        match self.mode {
            Mode::Typing { cursor } => {
                let cursor = cursor + 1;
                self.caret_visible = true;
                self.mode = if cursor >= self.current_len() {
                    Mode::Paused
                } else {
                    Mode::Typing { cursor }
                };
                frame = Some(self.frame());
            }
            Mode::Paused => {
                let was_hidden = !self.caret_visible;
                self.caret_visible = true;
                match self.current_len() {
                    0 => cycle_completed = self.finish_phrase(),
                    len => self.mode = Mode::Deleting { cursor: len },
                }
                if was_hidden {
                    frame = Some(self.frame());
                }
            }
            Mode::Deleting { cursor } => {
                let cursor = cursor.saturating_sub(1);
                self.caret_visible = true;
                frame = Some(Frame::new(
                    self.phrases.prefix(self.phrase_index, cursor),
                    true,
                ));
                if cursor == 0 {
                    cycle_completed = self.finish_phrase();
                } else {
                    self.mode = Mode::Deleting { cursor };
                }
            }
            Mode::Done => {}
        }

        Transition {
            frame,
            next_in: self.pending_delay(),
            from,
            to: self.mode.kind(),
            cycle_completed,
        }
    }

    /// Flips the caret while blinking. Returns `None` during active
    /// typing or deleting, where the caret is held visible.
    pub fn toggle_caret(&mut self) -> Option<Frame> {
        if !self.is_blinking() {
            return None;
        }
        self.caret_visible = !self.caret_visible;
        Some(self.frame())
    }

    /// Delay until the next character-timer tick for the current mode.
    #[must_use]
    pub fn pending_delay(&self) -> Option<Duration> {
        match self.mode {
            Mode::Typing { .. } => Some(self.config.effective_type_delay()),
            Mode::Paused => Some(self.config.effective_pause_duration()),
            Mode::Deleting { .. } => Some(self.config.effective_delete_delay()),
            Mode::Done => None,
        }
    }

    /// Whether the caret blinks in the current mode.
    #[must_use]
    pub const fn is_blinking(&self) -> bool {
        matches!(self.mode, Mode::Paused | Mode::Done)
    }

    /// Whether the engine has reached its terminal state.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.mode, Mode::Done)
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the active phrase.
    #[must_use]
    pub const fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    /// Number of visible characters of the active phrase.
    #[must_use]
    pub fn cursor(&self) -> usize {
        match self.mode {
            Mode::Typing { cursor } | Mode::Deleting { cursor } => cursor,
            Mode::Paused => self.current_len(),
            Mode::Done => 0,
        }
    }

    /// Current caret visibility.
    #[must_use]
    pub const fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Completed traversals of the phrase list.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The configuration this machine runs with.
    #[must_use]
    pub const fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    /// The phrase list.
    #[must_use]
    pub const fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    /// The currently visible text.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        self.phrases.prefix(self.phrase_index, self.cursor())
    }

    /// The current frame.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame::new(self.visible_text(), self.caret_visible)
    }

    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            phrase_index: self.phrase_index,
            mode: self.mode,
            caret_visible: self.caret_visible,
            cycles: self.cycles,
        }
    }

    fn current_len(&self) -> usize {
        self.phrases.char_len(self.phrase_index)
    }

    fn enter_typing(&mut self) {
        self.caret_visible = true;
        self.mode = if self.current_len() == 0 {
            Mode::Paused
        } else {
            Mode::Typing { cursor: 0 }
        };
    }

    /// Moves past a fully deleted phrase. Returns whether a cycle completed.
    fn finish_phrase(&mut self) -> bool {
        let last = self.phrase_index + 1 == self.phrases.len();
        if last {
            self.cycles += 1;
            if !self.config.infinite {
                // phrase_index stays on the last phrase
                self.mode = Mode::Done;
                self.caret_visible = true;
                return true;
            }
        }
        self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
        self.enter_typing();
        last
    }
}
