//! Engine orchestration.
//!
//! [`TypewriterEngine`] spawns one tokio task per engine. The task owns the
//! [`Typewriter`] state machine and sleeps until the earlier of two
//! deadlines: the next character tick and, while the caret blinks, the next
//! caret toggle. Teardown cancels the task through a `CancellationToken`
//! and closes the sink slot, so nothing is rendered after
//! [`EngineHandle::stop`] returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::error::ConfigurationError;
use crate::observability::metrics::{self, FrameKind};
use crate::observability::{Event, EventEmitter};

use super::machine::{Transition, Typewriter};
use super::phrases::PhraseList;
use super::sink::{RenderSink, SinkSlot};
use super::state::{ModeKind, Snapshot};
use super::timing::TypewriterConfig;

static NEXT_ENGINE_ID: AtomicU64 = AtomicU64::new(1);

/// A configured, not yet running engine.
#[derive(Debug)]
pub struct TypewriterEngine {
    phrases: PhraseList,
    config: TypewriterConfig,
    events: Option<Arc<EventEmitter>>,
}

impl TypewriterEngine {
    /// Creates an engine for `phrases`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyPhraseList`] if `phrases` is empty.
    pub fn new<I, S>(phrases: I, config: TypewriterConfig) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_phrase_list(PhraseList::new(phrases)?, config))
    }

    /// Creates an engine from an already validated phrase list.
    #[must_use]
    pub const fn from_phrase_list(phrases: PhraseList, config: TypewriterConfig) -> Self {
        Self {
            phrases,
            config,
            events: None,
        }
    }

    /// Attaches a lifecycle event stream.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Spawns the engine task and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start<S>(self, sink: S) -> EngineHandle
    where
        S: RenderSink + 'static,
    {
        let id = NEXT_ENGINE_ID.fetch_add(1, Ordering::Relaxed);
        let machine = Typewriter::new(self.phrases, self.config);
        let (state_tx, state_rx) = watch::channel(machine.snapshot());
        let cancel = CancellationToken::new();
        let sink = Arc::new(SinkSlot::new(Box::new(sink)));

        info!(
            engine_id = id,
            phrases = machine.phrases().len(),
            infinite = machine.config().infinite,
            "typewriter started"
        );
        if let Some(events) = &self.events {
            events.emit(Event::EngineStarted {
                timestamp: Utc::now(),
                engine_id: id,
                phrases: machine.phrases().len(),
                infinite: machine.config().infinite,
            });
        }

        let task = tokio::spawn(run(
            machine,
            TaskContext {
                id,
                cancel: cancel.clone(),
                sink: Arc::clone(&sink),
                state_tx,
                events: self.events,
            },
        ));

        EngineHandle {
            id,
            cancel,
            sink,
            state: state_rx,
            task: Some(task),
        }
    }
}

/// Starts an engine over `phrases`, rendering into `sink`.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyPhraseList`] before anything is
/// scheduled if `phrases` is empty.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn start<I, S, K>(
    phrases: I,
    config: TypewriterConfig,
    sink: K,
) -> Result<EngineHandle, ConfigurationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    K: RenderSink + 'static,
{
    Ok(TypewriterEngine::new(phrases, config)?.start(sink))
}

/// Stops an engine. Idempotent.
pub fn stop(handle: &EngineHandle) {
    handle.stop();
}

/// Handle to a running engine. Dropping it stops the engine.
#[derive(Debug)]
pub struct EngineHandle {
    id: u64,
    cancel: CancellationToken,
    sink: Arc<SinkSlot>,
    state: watch::Receiver<Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl EngineHandle {
    /// Process-unique engine id, as seen in logs and events.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Stops the engine.
    ///
    /// After this returns the sink is dropped and will never be called
    /// again. Calling it more than once is a no-op.
    pub fn stop(&self) {
        if self.sink.close() {
            info!(engine_id = self.id, "typewriter stopped");
        }
        self.cancel.cancel();
    }

    /// Whether [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The latest published state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        *self.state.borrow()
    }

    /// A receiver notified after every tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.clone()
    }

    /// Waits until the engine reaches `Done`.
    ///
    /// Returns immediately if it already has, and never returns for an
    /// infinite engine unless it is stopped, in which case it returns
    /// once the task has exited.
    pub async fn wait_until_done(&self) {
        let mut rx = self.state.clone();
        let _ = rx.wait_for(|s| s.mode.kind() == ModeKind::Done).await;
    }

    /// Waits for the engine task to exit. Only returns after a stop.
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

struct TaskContext {
    id: u64,
    cancel: CancellationToken,
    sink: Arc<SinkSlot>,
    state_tx: watch::Sender<Snapshot>,
    events: Option<Arc<EventEmitter>>,
}

/// Keeps the active-engine gauge balanced however the task ends.
struct ActiveGuard;

impl ActiveGuard {
    fn new() -> Self {
        metrics::engine_started();
        Self
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        metrics::engine_stopped();
    }
}

async fn run(mut machine: Typewriter, ctx: TaskContext) {
    let _active = ActiveGuard::new();
    let half = machine.config().blink_half_period();
    let started = Instant::now();
    let mut frames: u64 = 0;

    let mut step_at = machine.pending_delay().and_then(|d| started.checked_add(d));
    let mut blink_at = if machine.is_blinking() {
        started.checked_add(half)
    } else {
        None
    };

    loop {
        let Some(deadline) = earliest(step_at, blink_at) else {
            ctx.cancel.cancelled().await;
            break;
        };

        tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => break,
            () = tokio::time::sleep_until(deadline) => {}
        }

        if step_at.is_some_and(|at| at <= deadline) {
            let was_blinking = machine.is_blinking();
            let transition = machine.advance();

            if let Some(frame) = &transition.frame {
                if !ctx.sink.emit(frame) {
                    break;
                }
                frames += 1;
                metrics::record_frame(frame_kind(&transition));
                trace!(engine_id = ctx.id, text = %frame.text, "frame");
            }

            step_at = transition.next_in.and_then(|d| deadline.checked_add(d));
            blink_at = match (was_blinking, machine.is_blinking()) {
                (_, false) => None,
                (false, true) => deadline.checked_add(half),
                (true, true) => blink_at,
            };

            report(&ctx, &machine, &transition);
        } else {
            if let Some(frame) = machine.toggle_caret() {
                if !ctx.sink.emit(&frame) {
                    break;
                }
                frames += 1;
                metrics::record_frame(FrameKind::Caret);
            }
            blink_at = deadline.checked_add(half);
        }

        ctx.state_tx.send_replace(machine.snapshot());
    }

    debug!(engine_id = ctx.id, frames, "typewriter task exited");
    if let Some(events) = &ctx.events {
        events.emit(Event::EngineStopped {
            timestamp: Utc::now(),
            engine_id: ctx.id,
            cycles: machine.cycles(),
            frames,
        });
    }
}

fn report(ctx: &TaskContext, machine: &Typewriter, transition: &Transition) {
    if transition.mode_changed() {
        debug!(
            engine_id = ctx.id,
            phrase_index = machine.phrase_index(),
            from = %transition.from,
            to = %transition.to,
            "mode changed"
        );
        metrics::record_mode_transition(transition.to);
        if let Some(events) = &ctx.events {
            events.emit(Event::ModeChanged {
                timestamp: Utc::now(),
                engine_id: ctx.id,
                phrase_index: machine.phrase_index(),
                from: transition.from,
                to: transition.to,
            });
        }
        if transition.to == ModeKind::Done {
            info!(engine_id = ctx.id, "typewriter finished final phrase");
        }
    }

    if transition.cycle_completed {
        metrics::record_cycle();
        if let Some(events) = &ctx.events {
            events.emit(Event::CycleCompleted {
                timestamp: Utc::now(),
                engine_id: ctx.id,
                cycle: machine.cycles(),
            });
        }
    }
}

const fn frame_kind(transition: &Transition) -> FrameKind {
    match transition.from {
        ModeKind::Typing | ModeKind::Deleting => FrameKind::Char,
        ModeKind::Paused | ModeKind::Done => FrameKind::Caret,
    }
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::sink::FrameLog;
    use crate::engine::state::{Frame, Mode};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn earliest_picks_minimum() {
        let now = Instant::now();
        assert_eq!(earliest(None, None), None);
        assert_eq!(earliest(Some(now), None), Some(now));
        assert_eq!(earliest(None, Some(now)), Some(now));
        assert_eq!(earliest(Some(now + ms(5)), Some(now)), Some(now));
    }

    #[test]
    fn empty_phrases_fail_before_spawning() {
        // No runtime here: an Ok path would panic inside tokio::spawn.
        let err = start(Vec::<&str>::new(), TypewriterConfig::default(), FrameLog::new())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyPhraseList);
    }

    #[tokio::test(start_paused = true)]
    async fn types_first_character_after_delay() {
        let log = FrameLog::new();
        let handle = start(["Hi"], TypewriterConfig::default(), log.clone()).unwrap();

        tokio::time::sleep(ms(99)).await;
        assert!(log.is_empty());

        tokio::time::sleep(ms(2)).await;
        assert_eq!(log.frames(), vec![Frame::new("H", true)]);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn caret_blinks_while_paused() {
        let log = FrameLog::new();
        let handle = start(["Hi"], TypewriterConfig::default(), log.clone()).unwrap();

        // "Hi" lands at 200ms; toggles at 600ms and 1000ms.
        tokio::time::sleep(ms(1050)).await;
        assert_eq!(
            log.frames(),
            vec![
                Frame::new("H", true),
                Frame::new("Hi", true),
                Frame::new("Hi", false),
                Frame::new("Hi", true),
            ]
        );
        assert_eq!(handle.snapshot().mode, Mode::Paused);
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn huge_pause_still_blinks() {
        let log = FrameLog::new();
        let config = TypewriterConfig::default().with_pause_duration(Duration::MAX);
        let handle = start(["Hi"], config, log.clone()).unwrap();

        tokio::time::sleep(ms(1050)).await;
        assert_eq!(
            log.frames(),
            vec![
                Frame::new("H", true),
                Frame::new("Hi", true),
                Frame::new("Hi", false),
                Frame::new("Hi", true),
            ]
        );
        assert_eq!(handle.snapshot().mode, Mode::Paused);
        assert!(!handle.is_stopped());
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_silences_sink() {
        let log = FrameLog::new();
        let handle = start(["Hello"], TypewriterConfig::default(), log.clone()).unwrap();

        tokio::time::sleep(ms(250)).await;
        handle.stop();
        let seen = log.len();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(log.len(), seen);
        assert!(handle.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_engine() {
        let log = FrameLog::new();
        let handle = start(["Hello"], TypewriterConfig::default(), log.clone()).unwrap();
        tokio::time::sleep(ms(150)).await;
        drop(handle);
        let seen = log.len();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(log.len(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn finished_returns_after_stop() {
        let mut handle =
            start(["Hi"], TypewriterConfig::default(), FrameLog::new()).unwrap();
        handle.stop();
        handle.finished().await;
        handle.finished().await;
    }

    #[tokio::test(start_paused = true)]
    async fn events_cover_lifecycle() {
        let emitter = Arc::new(EventEmitter::noop());
        let config = TypewriterConfig::default().with_infinite(false);
        let mut handle = TypewriterEngine::new(["X"], config)
            .unwrap()
            .with_events(Arc::clone(&emitter))
            .start(FrameLog::new());

        handle.wait_until_done().await;
        handle.stop();
        handle.finished().await;

        // started, typing->paused, paused->deleting, deleting->done,
        // cycle completed, stopped
        assert_eq!(emitter.event_count(), 6);
    }
}
