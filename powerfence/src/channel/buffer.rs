//! Expect buffer with escape-sequence stripping and windowed search.
//!
//! Management consoles colour and reposition their output. Everything that
//! is not printable text (or a line-control character) is dropped on the way
//! in, so prompt patterns match what a human would read.
//!
//! Searching is windowed: after new data arrives only
//! the new bytes plus a window of `search_depth` bytes before them are
//! searched, not the whole accumulated output.

use vte::{Parser, Perform};

use super::patterns::{PromptMatch, PromptSet};

/// Collects the printable part of a terminal byte stream.
struct Printable<'a> {
    out: &'a mut Vec<u8>,
}

impl Perform for Printable<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.out.push(byte);
        }
    }
}

/// Buffer for accumulating session output and searching it for prompts.
pub struct PatternBuffer {
    /// The accumulated, stripped output.
    buffer: Vec<u8>,

    /// Escape-sequence parser; kept across chunks so split sequences are
    /// still recognized.
    parser: Parser,

    /// How many bytes before the newest data are searched again.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            parser: Parser::new(),
            search_depth,
        }
    }

    /// Extend the buffer with new data, stripping escape sequences.
    pub fn extend(&mut self, data: &[u8]) {
        let mut printable = Printable {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut printable, data);
    }

    /// Search for a prompt in the data added after `mark`, plus the
    /// `search_depth` bytes before it.
    ///
    /// Offsets in the returned match are absolute buffer offsets.
    pub fn search_since(&self, prompts: &PromptSet, mark: usize) -> Option<PromptMatch> {
        let start = mark.min(self.buffer.len()).saturating_sub(self.search_depth);
        prompts.find(&self.buffer[start..]).map(|m| PromptMatch {
            index: m.index,
            start: m.start + start,
            end: m.end + start,
        })
    }

    /// Remove everything up to the end of `m` from the buffer.
    ///
    /// Returns the text before the match and the matched text. Bytes after
    /// the match stay buffered for the next search.
    pub fn split_at_match(&mut self, m: &PromptMatch) -> (String, String) {
        let consumed: Vec<u8> = self.buffer.drain(..m.end).collect();
        let before = String::from_utf8_lossy(&consumed[..m.start]).into_owned();
        let matched = String::from_utf8_lossy(&consumed[m.start..]).into_owned();
        (before, matched)
    }

    /// Get the buffer contents as a string (lossy UTF-8 conversion).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("len", &self.buffer.len())
            .field("search_depth", &self.search_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"Hello, world!\r\n");
        assert_eq!(buffer.as_str_lossy(), "Hello, world!\r\n");
    }

    #[test]
    fn test_escape_stripping() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"\x1b[32mON\x1b[0m\r\n\x1b[2J");
        assert_eq!(buffer.as_str_lossy(), "ON\r\n");
    }

    #[test]
    fn test_escape_split_across_chunks() {
        let mut buffer = PatternBuffer::new(100);
        buffer.extend(b"power \x1b[1");
        buffer.extend(b";31mOFF");
        assert_eq!(buffer.as_str_lossy(), "power OFF");
    }

    #[test]
    fn test_search_window() {
        let mut buffer = PatternBuffer::new(10);
        let prompts = PromptSet::single("router#").unwrap();

        buffer.extend(b"router#");
        buffer.extend(&[b'x'; 100]);

        // Prompt sits outside the window before the newest data
        assert!(buffer.search_since(&prompts, 107).is_none());
        // A search from the start sees it
        assert!(buffer.search_since(&prompts, 0).is_some());
    }

    #[test]
    fn test_split_keeps_remainder() {
        let mut buffer = PatternBuffer::new(100);
        let prompts = PromptSet::single("IPS>").unwrap();
        buffer.extend(b"output\r\nIPS> extra");

        let m = buffer.search_since(&prompts, 0).unwrap();
        let (before, matched) = buffer.split_at_match(&m);
        assert_eq!(before, "output\r\n");
        assert_eq!(matched, "IPS>");
        assert_eq!(buffer.as_str_lossy(), " extra");
    }
}
