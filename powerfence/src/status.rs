//! Power states, query outcomes and requested actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, Error};

/// Canonical power state of a fenced unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
    /// The device answered, but not with on or off. Not a fault.
    Unknown,
}

impl PowerState {
    /// Normalize a vendor reply token.
    ///
    /// The text is trimmed and lower-cased before comparison.
    pub fn from_reply(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "on" => PowerState::On,
            "off" => PowerState::Off,
            _ => PowerState::Unknown,
        }
    }

    /// The command-line verb for this state (`on` / `off`).
    pub fn verb(&self) -> Option<&'static str> {
        match self {
            PowerState::On => Some("on"),
            PowerState::Off => Some("off"),
            PowerState::Unknown => None,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerState::On => write!(f, "on"),
            PowerState::Off => write!(f, "off"),
            PowerState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of a status query.
///
/// `NotFound` and `Unparseable` both read as [`PowerState::Unknown`], but keep
/// "looked and didn't find" apart from "could not understand the reply".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStatus {
    /// The device reported a status token for the target.
    Reported {
        state: PowerState,
        /// Lower-cased, trimmed vendor text.
        token: String,
    },

    /// The reply was understood but the target was not listed.
    NotFound,

    /// The reply did not have the expected shape.
    Unparseable { reason: String },
}

impl PowerStatus {
    /// Build a reported status from raw vendor text.
    pub fn reported(raw: &str) -> Self {
        let token = raw.trim().to_lowercase();
        PowerStatus::Reported {
            state: PowerState::from_reply(&token),
            token,
        }
    }

    pub(crate) fn unparseable(reason: impl Into<String>) -> Self {
        PowerStatus::Unparseable {
            reason: reason.into(),
        }
    }

    /// The canonical state.
    pub fn state(&self) -> PowerState {
        match self {
            PowerStatus::Reported { state, .. } => *state,
            PowerStatus::NotFound | PowerStatus::Unparseable { .. } => PowerState::Unknown,
        }
    }

    /// The vendor token, if the device reported one.
    pub fn token(&self) -> Option<&str> {
        match self {
            PowerStatus::Reported { token, .. } => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerStatus::Reported { token, .. } => write!(f, "{}", token),
            PowerStatus::NotFound => write!(f, "unknown (not listed)"),
            PowerStatus::Unparseable { reason } => write!(f, "unknown ({})", reason),
        }
    }
}

/// Action requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FenceAction {
    #[default]
    Status,
    On,
    Off,
    Reboot,
    Monitor,
}

impl FenceAction {
    /// The power state a single-transition action drives the target to.
    ///
    /// `Reboot` is an off/on cycle run by the orchestrator and has no single
    /// desired state.
    pub fn desired_state(&self) -> Option<PowerState> {
        match self {
            FenceAction::On => Some(PowerState::On),
            FenceAction::Off => Some(PowerState::Off),
            _ => None,
        }
    }
}

impl FromStr for FenceAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "status" => Ok(FenceAction::Status),
            "on" => Ok(FenceAction::On),
            "off" => Ok(FenceAction::Off),
            "reboot" => Ok(FenceAction::Reboot),
            "monitor" => Ok(FenceAction::Monitor),
            _ => Err(DriverError::UnknownAction {
                token: s.to_string(),
            }
            .into()),
        }
    }
}
