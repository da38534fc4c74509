//! Channel layer: the interactive session and prompt matching.
//!
//! This module handles the send/expect conversation with a device,
//! including pattern-based prompt detection and escape-sequence stripping.

mod buffer;
#[cfg(test)]
pub(crate) mod mock;
mod patterns;
mod session;
mod stream;

pub use buffer::PatternBuffer;
pub use patterns::{PromptMatch, PromptSet};
pub use session::{Expectation, LINE_ENDING, Session};
pub use stream::StreamSession;
