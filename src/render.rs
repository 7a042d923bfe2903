//! Render sinks for the CLI host.
//!
//! [`TerminalSink`] redraws a single line in place. [`JsonLinesSink`] writes
//! each frame as one JSON object per line, for piping into other tools.
//! Write failures are dropped: a closed pipe must not take the engine down.

use std::io::Write;

use crate::engine::{Frame, RenderSink};

/// Default caret glyph.
pub const DEFAULT_CARET: char = '▌';

/// Clears the current line and returns the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Redraws the visible text and caret on one terminal line.
#[derive(Debug)]
pub struct TerminalSink<W> {
    out: W,
    caret: char,
}

impl<W: Write + Send> TerminalSink<W> {
    /// Creates a sink writing to `out` with the default caret.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            caret: DEFAULT_CARET,
        }
    }

    /// Uses `caret` as the caret glyph.
    #[must_use]
    pub fn with_caret(mut self, caret: char) -> Self {
        self.caret = caret;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSink for TerminalSink<W> {
    fn render(&mut self, frame: &Frame) {
        let caret = if frame.caret_visible { self.caret } else { ' ' };
        let _ = write!(self.out, "{CLEAR_LINE}{}{caret}", frame.text);
        let _ = self.out.flush();
    }
}

/// Writes frames as JSON lines.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Creates a sink writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> RenderSink for JsonLinesSink<W> {
    fn render(&mut self, frame: &Frame) {
        if let Ok(line) = serde_json::to_string(frame) {
            let _ = writeln!(self.out, "{line}");
            let _ = self.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_sink_redraws_line() {
        let mut sink = TerminalSink::new(Vec::new()).with_caret('|');
        sink.render(&Frame::new("Hi", true));
        sink.render(&Frame::new("Hi", false));
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "\r\x1b[2KHi|\r\x1b[2KHi ");
    }

    #[test]
    fn json_sink_writes_one_object_per_frame() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.render(&Frame::new("B", true));
        sink.render(&Frame::new("By", true));
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["text"], "By");
        assert_eq!(lines[1]["caret_visible"], true);
    }
}
