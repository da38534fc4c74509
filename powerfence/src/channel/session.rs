//! The interactive session contract drivers talk through.

use std::time::Duration;

use async_trait::async_trait;

use super::patterns::PromptSet;
use crate::error::ChannelError;

/// Line terminator management consoles expect.
pub const LINE_ENDING: &str = "\r\n";

/// An open, bidirectional text channel to a device's management interface.
///
/// Every exchange is a strict send-then-expect pair; a new command is never
/// issued before the previous expectation resolves or faults. Sessions are
/// owned by the caller. Drivers borrow them for a single operation and never
/// close them.
#[async_trait]
pub trait Session: Send {
    /// Send raw text.
    async fn send(&mut self, text: &str) -> Result<(), ChannelError>;

    /// Send a line terminated with CRLF.
    async fn send_line(&mut self, line: &str) -> Result<(), ChannelError> {
        self.send(&format!("{}{}", line, LINE_ENDING)).await
    }

    /// Wait until one of `prompts` appears.
    ///
    /// Fails with [`ChannelError::Closed`] if the channel closes, or
    /// [`ChannelError::PatternTimeout`] if nothing matches within `timeout`.
    async fn expect(
        &mut self,
        prompts: &PromptSet,
        timeout: Duration,
    ) -> Result<Expectation, ChannelError>;

    /// Release the channel.
    async fn close(&mut self) -> Result<(), ChannelError>;
}

/// Output captured by a successful expect.
#[derive(Debug, Clone)]
pub struct Expectation {
    /// Text received before the prompt (command echo included).
    pub before: String,

    /// The prompt text that matched.
    pub matched: String,

    /// Index of the prompt alternative that matched.
    pub index: usize,

    /// Time spent waiting.
    pub elapsed: Duration,
}

impl Expectation {
    /// Get the captured lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.before.lines()
    }

    /// The last captured line with content, trimmed.
    pub fn last_line(&self) -> Option<&str> {
        self.before
            .lines()
            .map(str::trim)
            .rfind(|line| !line.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expectation(before: &str) -> Expectation {
        Expectation {
            before: before.to_string(),
            matched: "system>".to_string(),
            index: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_last_line_skips_blank_lines() {
        let e = expectation("power -state\r\nOn\r\n\r\n  \r\n");
        assert_eq!(e.last_line(), Some("On"));
    }

    #[test]
    fn test_last_line_empty_capture() {
        assert_eq!(expectation("\r\n").last_line(), None);
    }
}
