//! Builder for creating fencers.

use secrecy::SecretString;

use super::fencer::Fencer;
use super::target::{Target, Timeouts};
use crate::channel::PromptSet;
use crate::device::{DeviceDefinition, DeviceRegistry};
use crate::error::{ChannelError, DeviceError, DriverError, Result};
use crate::status::FenceAction;

/// Builder for constructing fencers.
///
/// # Example
///
/// ```rust
/// use powerfence::FenceBuilder;
///
/// # fn example() -> Result<(), powerfence::Error> {
/// let fencer = FenceBuilder::new("bladecenter.example.com")
///     .device("bladecenter")
///     .username("USERID")
///     .password("PASSW0RD")
///     .plug("3")
///     .build()?;
/// assert_eq!(fencer.target().port, 23);
/// # Ok(())
/// # }
/// ```
pub struct FenceBuilder {
    host: String,
    port: Option<u16>,
    username: Option<String>,
    password: Option<SecretString>,
    plug: Option<String>,
    prompts: Vec<String>,
    action: FenceAction,
    timeouts: Timeouts,
    device_name: Option<String>,
    custom_device: Option<DeviceDefinition>,
}

impl FenceBuilder {
    /// Create a new fence builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            username: None,
            password: None,
            plug: None,
            prompts: Vec::new(),
            action: FenceAction::default(),
            timeouts: Timeouts::default(),
            device_name: None,
            custom_device: None,
        }
    }

    /// Set the console port (default: the device's, usually 23).
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the login name.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the outlet or blade identifier.
    pub fn plug(mut self, plug: impl Into<String>) -> Self {
        self.plug = Some(plug.into());
        self
    }

    /// Add an acceptable command prompt pattern.
    ///
    /// When no prompt is given the device's defaults are used.
    pub fn prompt(mut self, pattern: impl Into<String>) -> Self {
        self.prompts.push(pattern.into());
        self
    }

    /// Replace the acceptable command prompt patterns.
    pub fn prompts<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prompts = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the requested action.
    pub fn action(mut self, action: FenceAction) -> Self {
        self.action = action;
        self
    }

    /// Set the timeout tiers.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the device name (e.g., "bladecenter", "ilo", "wti").
    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    /// Set a custom device definition.
    pub fn custom_device(mut self, device: DeviceDefinition) -> Self {
        self.custom_device = Some(device);
        self
    }

    /// Build the fencer.
    ///
    /// This validates the request but does not connect.
    pub fn build(self) -> Result<Fencer> {
        let device = if let Some(custom) = self.custom_device {
            custom
        } else if let Some(name) = self.device_name {
            DeviceRegistry::lookup(&name)?
        } else {
            return Err(DeviceError::InvalidDefinition {
                message: "Device must be specified".to_string(),
            }
            .into());
        };

        let password = self.password.ok_or_else(|| invalid("Password is required"))?;

        if self.username.is_none() && !device.login_optional {
            return Err(invalid(format!(
                "Device '{}' requires a login name",
                device.name
            ))
            .into());
        }

        if device.requires_plug && self.plug.as_deref().is_none_or(str::is_empty) {
            return Err(invalid(format!(
                "Device '{}' requires a plug (outlet or blade)",
                device.name
            ))
            .into());
        }

        let prompts = if self.prompts.is_empty() {
            device.prompts()
        } else {
            PromptSet::new(&self.prompts)
        }
        .map_err(ChannelError::from)?;
        if prompts.is_empty() {
            return Err(invalid("At least one command prompt is required").into());
        }

        let target = Target {
            address: self.host,
            port: self.port.unwrap_or(device.default_port),
            login: self.username,
            password,
            plug: self.plug,
            prompts,
            action: self.action,
            timeouts: self.timeouts,
        };

        Ok(Fencer::new(target, device))
    }
}

fn invalid(message: impl Into<String>) -> DriverError {
    DriverError::InvalidConfig {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::device::vendors::wti::WtiDriver;
    use crate::error::Error;

    #[test]
    fn test_prompts_default_to_device() {
        let fencer = FenceBuilder::new("pdu")
            .device("wti")
            .password("pw")
            .plug("1")
            .build()
            .unwrap();
        let prompts: Vec<_> = fencer.target().prompts.patterns().collect();
        assert_eq!(prompts, vec!["RSM>", "MPC>", "IPS>", "TPS>", "NBB>", "NPS>"]);
        assert!(fencer.target().login.is_none());
    }

    #[test]
    fn test_explicit_prompts_and_settings() {
        let timeouts = Timeouts {
            power: Duration::from_secs(60),
            ..Timeouts::default()
        };
        let fencer = FenceBuilder::new("bc")
            .device("bladecenter")
            .username("USERID")
            .password("pw")
            .plug("2")
            .prompt("chassis>")
            .port(2323)
            .action(FenceAction::Reboot)
            .timeouts(timeouts)
            .build()
            .unwrap();

        let target = fencer.target();
        assert_eq!(target.prompts.patterns().collect::<Vec<_>>(), vec!["chassis>"]);
        assert_eq!(target.port, 2323);
        assert_eq!(target.action, FenceAction::Reboot);
        assert_eq!(target.timeouts.power, Duration::from_secs(60));
    }

    #[test]
    fn test_device_required() {
        let err = FenceBuilder::new("x").password("pw").build().unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::InvalidDefinition { .. })));
    }

    #[test]
    fn test_unknown_device() {
        let err = FenceBuilder::new("x")
            .device("apc")
            .password("pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::UnknownDevice { .. })));
    }

    #[test]
    fn test_plug_required_for_multi_unit_devices() {
        let err = FenceBuilder::new("bc")
            .device("bladecenter")
            .username("USERID")
            .password("pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));

        // iLO controls a single server.
        assert!(
            FenceBuilder::new("ilo")
                .device("ilo")
                .username("Administrator")
                .password("pw")
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_login_name_required_unless_optional() {
        let err = FenceBuilder::new("ilo")
            .device("ilo")
            .password("pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_password_required() {
        let err = FenceBuilder::new("pdu")
            .device("wti")
            .plug("1")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }

    #[test]
    fn test_invalid_prompt_pattern() {
        let err = FenceBuilder::new("pdu")
            .device("wti")
            .password("pw")
            .plug("1")
            .prompt("IPS[")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::InvalidPattern(_))));
    }

    #[test]
    fn test_custom_device_without_prompts() {
        let device = DeviceDefinition::new("bare", Arc::new(WtiDriver::default()))
            .with_optional_login();
        let err = FenceBuilder::new("pdu")
            .custom_device(device)
            .password("pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Driver(DriverError::InvalidConfig { .. })));
    }
}
