//! Transport fault classification.
//!
//! A session reports two kinds of transport trouble: the channel closed, or
//! no prompt matched before the deadline. Which [`FaultKind`] that becomes
//! depends on the [`Phase`] the operation was in. Anything that goes wrong
//! before the steady command prompt is reached counts as a refused login.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, Error};

/// Semantic fault surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The channel closed mid-operation.
    ConnectionLost,

    /// The device did not answer with an expected prompt in time.
    TimedOut,

    /// The device could not be brought to its command prompt.
    LoginDenied,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::ConnectionLost => write!(f, "connection lost"),
            FaultKind::TimedOut => write!(f, "timed out"),
            FaultKind::LoginDenied => write!(f, "login denied"),
        }
    }
}

/// Sub-phase of an operation, used to classify faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Authenticating, before the command prompt was first seen.
    Login,

    /// Issuing commands at the command prompt.
    Command,
}

/// Map a channel error to a fault kind.
///
/// Returns `None` for channel errors that are not transport faults.
pub fn fault_kind(error: &ChannelError, phase: Phase) -> Option<FaultKind> {
    match (error, phase) {
        (ChannelError::Closed | ChannelError::PatternTimeout(_), Phase::Login) => {
            Some(FaultKind::LoginDenied)
        }
        (ChannelError::Closed, Phase::Command) => Some(FaultKind::ConnectionLost),
        (ChannelError::PatternTimeout(_), Phase::Command) => Some(FaultKind::TimedOut),
        (ChannelError::InvalidPattern(_), _) => None,
    }
}

/// Convert a channel error into the crate error, classifying transport faults.
pub fn classify(error: ChannelError, phase: Phase) -> Error {
    match fault_kind(&error, phase) {
        Some(kind) => Error::Fault(kind),
        None => Error::Channel(error),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_command_phase() {
        assert_eq!(
            fault_kind(&ChannelError::Closed, Phase::Command),
            Some(FaultKind::ConnectionLost)
        );
        assert_eq!(
            fault_kind(
                &ChannelError::PatternTimeout(Duration::from_secs(3)),
                Phase::Command
            ),
            Some(FaultKind::TimedOut)
        );
    }

    #[test]
    fn test_login_phase_is_always_login_denied() {
        assert_eq!(
            fault_kind(&ChannelError::Closed, Phase::Login),
            Some(FaultKind::LoginDenied)
        );
        assert_eq!(
            fault_kind(
                &ChannelError::PatternTimeout(Duration::from_secs(5)),
                Phase::Login
            ),
            Some(FaultKind::LoginDenied)
        );
    }

    #[test]
    fn test_invalid_pattern_is_not_a_fault() {
        let err = regex::Regex::new("(").unwrap_err();
        let error = classify(ChannelError::InvalidPattern(err), Phase::Command);
        assert!(matches!(error, Error::Channel(ChannelError::InvalidPattern(_))));
        assert_eq!(error.fault_kind(), None);
    }

    #[test]
    fn test_classify_wraps_fault() {
        let error = classify(ChannelError::Closed, Phase::Command);
        assert_eq!(error.fault_kind(), Some(FaultKind::ConnectionLost));
        assert_eq!(error.to_string(), "Fence fault: connection lost");
    }
}
