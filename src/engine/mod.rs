//! Typewriter engine
//!
//! Cycles through a list of phrases, typing and deleting them one character
//! at a time, with a blinking caret while paused or done.
//!
//! # Architecture
//!
//! - [`PhraseList`]: non-empty phrase storage with char-boundary prefixes
//! - [`TypewriterConfig`]: delays, pause, blink period, infinite/finite
//! - [`Typewriter`]: sans-IO state machine (`Typing | Paused | Deleting | Done`)
//! - [`TypewriterEngine`] / [`EngineHandle`]: tokio driver and teardown
//! - [`RenderSink`]: where frames go

pub mod driver;
pub mod machine;
pub mod phrases;
pub mod sink;
pub mod state;
pub mod timing;

pub use driver::{EngineHandle, TypewriterEngine, start, stop};
pub use machine::{Transition, Typewriter};
pub use phrases::PhraseList;
pub use sink::{FrameLog, RenderSink};
pub use state::{Frame, Mode, ModeKind, Snapshot};
pub use timing::{MAX_DELAY, MIN_TICK, TypewriterConfig};
