//! Per-vendor command templates.

use crate::error::{DriverError, Result};
use crate::status::PowerState;

/// Placeholder substituted with the outlet/blade identifier.
pub const PLUG_PLACEHOLDER: &str = "{plug}";

/// Command strings a driver sends, with `{plug}` standing for the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// Query the power status.
    pub status: String,

    /// Switch power on.
    pub power_on: String,

    /// Switch power off.
    pub power_off: String,

    /// Enter the sub-unit context (context-switching devices only).
    pub enter_context: Option<String>,

    /// Restore the outer context.
    pub exit_context: Option<String>,
}

impl CommandSet {
    pub fn new(
        status: impl Into<String>,
        power_on: impl Into<String>,
        power_off: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            power_on: power_on.into(),
            power_off: power_off.into(),
            enter_context: None,
            exit_context: None,
        }
    }

    /// Set the context enter/exit commands.
    pub fn with_context(mut self, enter: impl Into<String>, exit: impl Into<String>) -> Self {
        self.enter_context = Some(enter.into());
        self.exit_context = Some(exit.into());
        self
    }

    /// Substitute the plug identifier into a template.
    pub fn render(template: &str, plug: &str) -> String {
        template.replace(PLUG_PLACEHOLDER, plug)
    }

    /// The status command for `plug`.
    pub fn status_for(&self, plug: &str) -> String {
        Self::render(&self.status, plug)
    }

    /// The transition command driving `plug` to `state`.
    pub fn power_for(&self, state: PowerState, plug: &str) -> Result<String> {
        let template = match state {
            PowerState::On => &self.power_on,
            PowerState::Off => &self.power_off,
            PowerState::Unknown => {
                return Err(DriverError::UnsupportedState {
                    state: state.to_string(),
                }
                .into());
            }
        };
        Ok(Self::render(template, plug))
    }

    /// The context enter/exit pair for `plug`.
    pub fn context_for(&self, plug: &str) -> Result<(String, String)> {
        match (&self.enter_context, &self.exit_context) {
            (Some(enter), Some(exit)) => Ok((Self::render(enter, plug), Self::render(exit, plug))),
            _ => Err(DriverError::InvalidConfig {
                message: "Command set has no context enter/exit commands".to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plug() {
        let commands = CommandSet::new("/S", "/on {plug},y", "/off {plug},y");
        assert_eq!(commands.status_for("3"), "/S");
        assert_eq!(commands.power_for(PowerState::On, "3").unwrap(), "/on 3,y");
        assert_eq!(commands.power_for(PowerState::Off, "A1").unwrap(), "/off A1,y");
    }

    #[test]
    fn test_unknown_is_not_a_transition() {
        let commands = CommandSet::new("POWER", "power on", "power off");
        assert!(commands.power_for(PowerState::Unknown, "").is_err());
    }

    #[test]
    fn test_context() {
        let commands = CommandSet::new("power -state", "power -on", "power -off")
            .with_context("env -T system:blade[{plug}]", "env -T system");
        let (enter, exit) = commands.context_for("7").unwrap();
        assert_eq!(enter, "env -T system:blade[7]");
        assert_eq!(exit, "env -T system");

        let flat = CommandSet::new("POWER", "power on", "power off");
        assert!(flat.context_for("7").is_err());
    }
}
