//! Serial output normalization.
//!
//! Raw capture buffers come straight off an emulated UART and routinely
//! contain escape sequences, NUL padding, and stray binary bytes mixed in
//! with the text the kernel printed. This module runs the buffer through a
//! VTE parser and keeps only printable characters and line breaks, producing
//! the two text projections the verifiers consume:
//!
//! - `lines`: printable runs with original line breaks preserved (empty
//!   lines dropped), used for per-line label extraction;
//! - `joined`: the same text with line breaks replaced by single spaces,
//!   used for marker matching that must survive a marker being split
//!   across line-buffering boundaries.
//!
//! Normalization is total: any byte sequence yields a result, and a buffer
//! with no printable content yields two empty strings.

use vte::{Parser as AnsiParser, Perform};

/// Normalized text projections of one capture buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOutput {
    /// Line-oriented view, line breaks preserved, empty lines removed
    pub lines: String,

    /// Single-line view, line breaks replaced by single spaces
    pub joined: String,
}

impl NormalizedOutput {
    /// Whether the buffer contained no printable text at all
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// VTE performer that collects printable text and newlines, discarding
/// escape sequences and other control bytes.
struct TextCollector {
    lines: Vec<String>,
    current: String,
}

impl TextCollector {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
        }
    }

    fn end_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.end_line();
        self.lines
    }
}

impl Perform for TextCollector {
    fn print(&mut self, c: char) {
        // Invalid UTF-8 in the raw buffer reaches us as replacement
        // characters; keep only the printable ASCII the kernel emits.
        if c.is_ascii_graphic() || c == ' ' {
            self.current.push(c);
        }
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.end_line(),
            b'\t' => self.current.push(' '),
            // CR, BEL, and everything else carry no text
            _ => {}
        }
    }
}

/// Normalize a raw capture buffer into its two text projections.
pub fn normalize(raw: &[u8]) -> NormalizedOutput {
    let mut parser = AnsiParser::new();
    let mut collector = TextCollector::new();
    for &byte in raw {
        parser.advance(&mut collector, byte);
    }

    let lines = collector.finish();
    let joined = lines.join(" ");
    NormalizedOutput {
        lines: lines.join("\n"),
        joined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_text_passthrough() {
        let out = normalize(b"[BOOT] JerichoOS v0.1.0 Starting...\n[DEMO 1] Hello\n");
        assert_eq!(
            out.lines,
            "[BOOT] JerichoOS v0.1.0 Starting...\n[DEMO 1] Hello"
        );
        assert_eq!(out.joined, "[BOOT] JerichoOS v0.1.0 Starting... [DEMO 1] Hello");
    }

    #[test]
    fn test_empty_input() {
        let out = normalize(b"");
        assert!(out.is_empty());
        assert_eq!(out.lines, "");
        assert_eq!(out.joined, "");
    }

    #[test]
    fn test_binary_contamination_stripped() {
        let mut raw = vec![0x00, 0x01, 0xff, 0xfe];
        raw.extend_from_slice(b"[DEMO 2] ok\n");
        raw.extend_from_slice(&[0x07, 0x00]);
        let out = normalize(&raw);
        assert_eq!(out.lines, "[DEMO 2] ok");
    }

    #[test]
    fn test_ansi_escapes_stripped() {
        let out = normalize(b"\x1b[2J\x1b[1;32mPASS\x1b[0m\n");
        assert_eq!(out.lines, "PASS");
    }

    #[test]
    fn test_crlf_collapses_to_single_break() {
        let out = normalize(b"one\r\ntwo\r\n");
        assert_eq!(out.lines, "one\ntwo");
        assert_eq!(out.joined, "one two");
    }

    #[test]
    fn test_empty_lines_dropped() {
        let out = normalize(b"first\n\n\nsecond\n");
        assert_eq!(out.lines, "first\nsecond");
    }

    #[test]
    fn test_only_control_bytes_yields_empty() {
        let out = normalize(&[0x00, 0x07, 0x1b, 0x5b, 0x41]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let raw = b"\x1b[31m[DEMO 1] Linear Memory\x1b[0m\r\nDelivered 7 messages to subscriber\n\x00";
        let first = normalize(raw);
        let second = normalize(first.lines.as_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_input_same_output() {
        let raw: Vec<u8> = (0u8..=255).collect();
        assert_eq!(normalize(&raw), normalize(&raw));
    }
}
