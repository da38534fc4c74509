//! Scripted session for driver tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use super::patterns::PromptSet;
use super::session::{Expectation, Session};
use crate::error::ChannelError;

/// What the device does in response to the next expect.
#[derive(Debug)]
enum Step {
    Reply(String),
    Close,
    Hang,
}

/// A session that answers expects from a script and records what was sent.
#[derive(Debug, Default)]
pub(crate) struct ScriptedSession {
    steps: VecDeque<Step>,
    sent: Vec<String>,
    timeouts: Vec<Duration>,
    closed: bool,
}

impl ScriptedSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The next expect receives `text`; it must contain the prompt.
    pub(crate) fn reply(mut self, text: &str) -> Self {
        self.steps.push_back(Step::Reply(text.to_string()));
        self
    }

    /// The channel closes during the next expect.
    pub(crate) fn close_channel(mut self) -> Self {
        self.steps.push_back(Step::Close);
        self
    }

    /// The device stays silent during the next expect.
    pub(crate) fn hang(mut self) -> Self {
        self.steps.push_back(Step::Hang);
        self
    }

    /// Lines sent so far, without line endings.
    pub(crate) fn sent(&self) -> Vec<&str> {
        self.sent.iter().map(|s| s.trim_end_matches("\r\n")).collect()
    }

    /// Timeouts passed to each expect, in order.
    pub(crate) fn timeouts(&self) -> &[Duration] {
        &self.timeouts
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        self.sent.push(text.to_string());
        Ok(())
    }

    async fn expect(
        &mut self,
        prompts: &PromptSet,
        timeout: Duration,
    ) -> Result<Expectation, ChannelError> {
        self.timeouts.push(timeout);
        match self.steps.pop_front() {
            Some(Step::Reply(text)) => match prompts.find(text.as_bytes()) {
                Some(m) => Ok(Expectation {
                    before: text[..m.start].to_string(),
                    matched: text[m.start..m.end].to_string(),
                    index: m.index,
                    elapsed: Duration::ZERO,
                }),
                None => Err(ChannelError::PatternTimeout(timeout)),
            },
            Some(Step::Hang) => Err(ChannelError::PatternTimeout(timeout)),
            Some(Step::Close) | None => {
                self.closed = true;
                Err(ChannelError::Closed)
            }
        }
    }

    async fn close(&mut self) -> Result<(), ChannelError> {
        self.closed = true;
        Ok(())
    }
}
