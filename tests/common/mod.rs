//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use typewriter::engine::{Frame, RenderSink};

/// Runs the compiled `typewriter` binary.
pub struct TypewriterProcess;

impl TypewriterProcess {
    /// Runs `typewriter <args>` to completion and captures its output.
    pub fn spawn_command(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_typewriter"))
            .args(args)
            .env_remove("TYPEWRITER_CONFIG")
            .env_remove("TYPEWRITER_LOG_LEVEL")
            .env_remove("TYPEWRITER_LOG_FORMAT")
            .output()
            .expect("failed to run typewriter binary")
    }
}

/// Writes `body` to `name` inside `dir` and returns the path.
pub fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("failed to write config fixture");
    path
}

/// A frame stamped with the virtual time it was rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped {
    pub at_ms: u64,
    pub frame: Frame,
}

/// Sink recording frames with their offset from creation.
///
/// Meant for `start_paused` tests, where offsets are exact.
#[derive(Debug, Clone)]
pub struct TimedLog {
    origin: Instant,
    frames: Arc<Mutex<Vec<Stamped>>>,
}

impl TimedLog {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            frames: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn frames(&self) -> Vec<Stamped> {
        self.frames.lock().unwrap().clone()
    }

    /// Frames where the visible text changed, as `(ms, text)`.
    pub fn text_changes(&self) -> Vec<(u64, String)> {
        let mut out: Vec<(u64, String)> = Vec::new();
        let mut last: Option<String> = None;
        for stamped in self.frames() {
            if last.as_deref() != Some(stamped.frame.text.as_str()) {
                last = Some(stamped.frame.text.clone());
                out.push((stamped.at_ms, stamped.frame.text));
            }
        }
        out
    }
}

impl RenderSink for TimedLog {
    fn render(&mut self, frame: &Frame) {
        let elapsed: Duration = self.origin.elapsed();
        let at_ms = u64::try_from(elapsed.as_millis()).unwrap();
        self.frames.lock().unwrap().push(Stamped {
            at_ms,
            frame: frame.clone(),
        });
    }
}
