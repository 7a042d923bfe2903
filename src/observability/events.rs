//! Structured engine event stream.
//!
//! Discrete, typed lifecycle events serialized as newline-delimited JSON
//! (JSONL) with a monotonically increasing sequence number. Individual
//! frames are not events; they go to the render sink.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::ModeKind;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A lifecycle event emitted by a running engine.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An engine was started.
    EngineStarted {
        /// When the engine started.
        timestamp: DateTime<Utc>,
        /// Process-unique engine id.
        engine_id: u64,
        /// Number of phrases in the cycle.
        phrases: usize,
        /// Whether the cycle repeats forever.
        infinite: bool,
    },

    /// The engine moved between modes.
    ModeChanged {
        /// When the transition happened.
        timestamp: DateTime<Utc>,
        /// Engine id.
        engine_id: u64,
        /// Active phrase after the transition.
        phrase_index: usize,
        /// Mode before.
        from: ModeKind,
        /// Mode after.
        to: ModeKind,
    },

    /// A full traversal of the phrase list finished.
    CycleCompleted {
        /// When the last phrase finished deleting.
        timestamp: DateTime<Utc>,
        /// Engine id.
        engine_id: u64,
        /// One-based count of completed cycles.
        cycle: u64,
    },

    /// The engine was torn down.
    EngineStopped {
        /// When the engine task exited.
        timestamp: DateTime<Utc>,
        /// Engine id.
        engine_id: u64,
        /// Completed cycles at teardown.
        cycles: u64,
        /// Frames delivered to the sink over the engine's lifetime.
        frames: u64,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are dropped; an event
/// stream must never stall an animation.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Opens the event destination named on the command line: `-` is
    /// stderr, anything else is a file path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if path == Path::new("-") {
            Ok(Self::stderr())
        } else {
            Self::from_file(path)
        }
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        // A panic mid-write leaves at worst a torn line; keep writing.
        let mut w = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(line) = serde_json::to_string(&envelope) {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_event() -> Event {
        Event::EngineStarted {
            timestamp: DateTime::parse_from_rfc3339("2025-02-04T10:15:30Z")
                .unwrap()
                .with_timezone(&Utc),
            engine_id: 3,
            phrases: 4,
            infinite: true,
        }
    }

    #[test]
    fn event_serializes_with_type_tag() {
        let json = serde_json::to_string(&sample_event()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["type"], "EngineStarted");
        assert_eq!(parsed["phrases"], 4);
    }

    #[test]
    fn mode_change_uses_snake_case_modes() {
        let event = Event::ModeChanged {
            timestamp: Utc::now(),
            engine_id: 1,
            phrase_index: 0,
            from: ModeKind::Typing,
            to: ModeKind::Paused,
        };
        let parsed = serde_json::to_value(&event).unwrap();
        assert_eq!(parsed["from"], "typing");
        assert_eq!(parsed["to"], "paused");
    }

    #[test]
    fn emitter_writes_valid_jsonl() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());

        let output = tw.contents();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(parsed["type"], "EngineStarted");
        assert_eq!(parsed["engine_id"], 3);
        assert_eq!(parsed["sequence"], 0);
    }

    #[test]
    fn emitter_increments_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(sample_event());
        emitter.emit(Event::EngineStopped {
            timestamp: Utc::now(),
            engine_id: 3,
            cycles: 2,
            frames: 40,
        });

        assert_eq!(emitter.event_count(), 2);

        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["frames"], 40);
    }

    #[test]
    fn envelope_flattens_event_fields() {
        let envelope = EventEnvelope {
            sequence: 7,
            event: sample_event(),
        };
        let parsed = serde_json::to_value(&envelope).unwrap();

        assert_eq!(parsed["sequence"], 7);
        assert_eq!(parsed["type"], "EngineStarted");
        assert!(
            parsed.get("event").is_none(),
            "event field should be flattened"
        );
    }

    #[test]
    fn keeps_writing_after_a_panicking_holder() {
        let out = TestWriter::new();
        let emitter = Arc::new(EventEmitter::new(Box::new(out.clone())));

        let held = Arc::clone(&emitter);
        let joined = std::thread::spawn(move || {
            let _guard = held.writer.lock().unwrap();
            panic!("writer holder died");
        })
        .join();
        assert!(joined.is_err());
        assert!(emitter.writer.is_poisoned());

        emitter.emit(sample_event());
        assert_eq!(emitter.event_count(), 1);
        let contents = out.contents();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["type"], "EngineStarted");
        assert_eq!(parsed["sequence"], 0);
    }

    #[test]
    fn open_creates_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let emitter = EventEmitter::open(&path).unwrap();
        emitter.emit(sample_event());
        drop(emitter);

        let body = std::fs::read_to_string(&path).unwrap();
        assert_eq!(body.lines().count(), 1);
    }

    #[test]
    fn noop_emitter_counts_but_discards() {
        let emitter = EventEmitter::noop();
        emitter.emit(sample_event());
        assert_eq!(emitter.event_count(), 1);
    }
}
