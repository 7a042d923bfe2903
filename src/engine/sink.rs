//! Render sinks.
//!
//! A [`RenderSink`] is the engine's only outbound collaborator. The engine
//! keeps its sink in a [`SinkSlot`] shared with the handle; closing the slot
//! is what makes "no emission after stop" hold even when the engine task is
//! running on another worker thread.

use std::sync::{Arc, Mutex, PoisonError};

use super::state::Frame;

/// Receives every visible change: character reveals/removals and caret
/// blink toggles.
pub trait RenderSink: Send {
    /// Called synchronously with the state update that produced `frame`.
    fn render(&mut self, frame: &Frame);
}

impl<F> RenderSink for F
where
    F: FnMut(&Frame) + Send,
{
    fn render(&mut self, frame: &Frame) {
        self(frame);
    }
}

/// Cloneable in-memory sink that records every frame.
///
/// Useful for tests and for hosts that poll rather than push.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl FrameLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out all frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The visible texts recorded so far, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.frames().into_iter().map(|f| f.text).collect()
    }

    /// Number of frames recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no frame has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderSink for FrameLog {
    fn render(&mut self, frame: &Frame) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.clone());
    }
}

/// The engine's sink, closable from the handle.
pub(crate) struct SinkSlot {
    inner: Mutex<Option<Box<dyn RenderSink>>>,
}

impl SinkSlot {
    pub(crate) fn new(sink: Box<dyn RenderSink>) -> Self {
        Self {
            inner: Mutex::new(Some(sink)),
        }
    }

    /// Renders `frame` if the slot is still open. Returns `false` once closed.
    pub(crate) fn emit(&self, frame: &Frame) -> bool {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(sink) => {
                sink.render(frame);
                true
            }
            None => false,
        }
    }

    /// Drops the sink. Returns `true` if this call closed it.
    pub(crate) fn close(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub(crate) fn is_open(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for SinkSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSlot")
            .field("open", &self.is_open())
            .finish()
    }
}
