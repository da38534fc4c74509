//! The fencing target: who to talk to, what to operate on, how long to wait.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::channel::PromptSet;
use crate::error::{DriverError, Result};
use crate::status::FenceAction;

/// Timeout tiers.
///
/// Power hardware acknowledges a transition before it has physically
/// completed, so commands that switch power wait for `power` instead of the
/// short interactive `shell` timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Reaching the command prompt after connecting.
    #[serde(with = "secs")]
    pub login: Duration,

    /// Command/prompt round trips.
    #[serde(with = "secs")]
    pub shell: Duration,

    /// Commands that trigger a power transition.
    #[serde(with = "secs")]
    pub power: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(5),
            shell: Duration::from_secs(3),
            power: Duration::from_secs(20),
        }
    }
}

/// Durations as (fractional) seconds.
mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Everything a driver needs to know about one fencing request.
///
/// Built once per operation (see [`FenceBuilder`](super::FenceBuilder)) and
/// passed by reference; drivers never modify it.
#[derive(Debug)]
pub struct Target {
    /// Device address (hostname or IP).
    pub address: String,

    /// Management console port.
    pub port: u16,

    /// Login name. Some outlet strips take a password only.
    pub login: Option<String>,

    /// Login credential.
    pub password: SecretString,

    /// Outlet or blade identifier.
    pub plug: Option<String>,

    /// Acceptable command prompts.
    pub prompts: PromptSet,

    /// Requested action.
    pub action: FenceAction,

    /// Timeout tiers.
    pub timeouts: Timeouts,
}

impl Target {
    /// The outlet/blade identifier, required by multi-unit devices.
    pub fn plug(&self) -> Result<&str> {
        self.plug.as_deref().ok_or_else(|| {
            DriverError::InvalidConfig {
                message: "Plug (outlet or blade) is required for this device".to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
impl Target {
    /// A target for driver tests.
    pub(crate) fn for_test(prompts: &[&str], login: Option<&str>, plug: Option<&str>) -> Self {
        Self {
            address: "fence.example.com".to_string(),
            port: 23,
            login: login.map(str::to_string),
            password: SecretString::from("s3cret".to_string()),
            plug: plug.map(str::to_string),
            prompts: PromptSet::new(prompts).unwrap(),
            action: FenceAction::Status,
            timeouts: Timeouts::default(),
        }
    }
}
