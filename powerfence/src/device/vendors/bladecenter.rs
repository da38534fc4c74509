//! IBM BladeCenter management module support.
//!
//! Commands address a blade by switching the console target:
//!
//! ```text
//! system> env -T system:blade[3]
//! OK
//! system:blade[3]> power -state
//! On
//! system:blade[3]> env -T system
//! OK
//! system>
//! ```
//!
//! Every operation enters the blade context, runs one command and restores
//! the chassis context before returning.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::channel::Session;
use crate::device::DeviceDefinition;
use crate::driver::{CommandSet, ContextScope, PowerDriver, Target};
use crate::error::Result;
use crate::status::{PowerState, PowerStatus};

/// Device name for IBM BladeCenter.
pub const DEVICE_NAME: &str = "bladecenter";

/// Prompt shown while a blade is the command target.
pub const BLADE_PROMPT: &str = "system:blade[{plug}]>";

/// Driver for chassis that switch into a per-blade command context.
#[derive(Debug, Clone)]
pub struct BladeCenterDriver {
    commands: CommandSet,
    blade_prompt: String,
}

impl BladeCenterDriver {
    pub fn new(commands: CommandSet, blade_prompt: impl Into<String>) -> Self {
        Self {
            commands,
            blade_prompt: blade_prompt.into(),
        }
    }

    async fn enter_blade<'a>(
        &self,
        session: &'a mut dyn Session,
        target: &'a Target,
    ) -> Result<ContextScope<'a>> {
        let plug = target.plug()?;
        let (enter, exit) = self.commands.context_for(plug)?;
        ContextScope::enter(
            session,
            &enter,
            &CommandSet::render(&self.blade_prompt, plug),
            exit,
            &target.prompts,
            target.timeouts.shell,
        )
        .await
    }
}

impl Default for BladeCenterDriver {
    fn default() -> Self {
        Self::new(
            CommandSet::new("power -state", "power -on", "power -off")
                .with_context("env -T system:blade[{plug}]", "env -T system"),
            BLADE_PROMPT,
        )
    }
}

#[async_trait]
impl PowerDriver for BladeCenterDriver {
    async fn query_status(
        &self,
        session: &mut dyn Session,
        target: &Target,
    ) -> Result<PowerStatus> {
        let plug = target.plug()?;
        let mut blade = self.enter_blade(session, target).await?;
        let reply = blade.send_command(&self.commands.status_for(plug)).await?;
        blade.leave().await?;

        // The reply is passed through as-is; the orchestrator decides what
        // an unexpected token means.
        let status = match reply.last_line() {
            Some(line) => PowerStatus::reported(line),
            None => PowerStatus::unparseable("empty reply to status query"),
        };
        debug!("Blade {} status: {}", plug, status);
        Ok(status)
    }

    async fn apply_state(
        &self,
        session: &mut dyn Session,
        target: &Target,
        desired: PowerState,
    ) -> Result<()> {
        let plug = target.plug()?;
        let command = self.commands.power_for(desired, plug)?;
        info!("Switching blade {} {}", plug, desired);

        let mut blade = self.enter_blade(session, target).await?;
        blade
            .send_command_with_timeout(&command, target.timeouts.power)
            .await?;
        blade.leave().await
    }
}

/// Create the BladeCenter device definition.
pub fn device() -> DeviceDefinition {
    DeviceDefinition::new(DEVICE_NAME, Arc::new(BladeCenterDriver::default()))
        .with_description("IBM BladeCenter management module")
        .with_prompt("system>")
        .with_logout("exit")
        .with_plug_required()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::ScriptedSession;
    use crate::classify::FaultKind;

    fn target(plug: &str) -> Target {
        Target::for_test(&["system>"], Some("USERID"), Some(plug))
    }

    #[tokio::test]
    async fn test_query_status_restores_context_last() {
        let mut session = ScriptedSession::new()
            .reply("env -T system:blade[3]\r\nOK\r\nsystem:blade[3]>")
            .reply(" power -state\r\nOn\r\nsystem:blade[3]>")
            .reply(" env -T system\r\nOK\r\nsystem>");

        let status = BladeCenterDriver::default()
            .query_status(&mut session, &target("3"))
            .await
            .unwrap();

        assert_eq!(status.state(), PowerState::On);
        assert_eq!(
            session.sent(),
            vec!["env -T system:blade[3]", "power -state", "env -T system"]
        );
    }

    #[tokio::test]
    async fn test_unexpected_token_passes_through() {
        let mut session = ScriptedSession::new()
            .reply("system:blade[1]>")
            .reply("power -state\r\nStandby\r\n\r\nsystem:blade[1]>")
            .reply("system>");

        let status = BladeCenterDriver::default()
            .query_status(&mut session, &target("1"))
            .await
            .unwrap();
        assert_eq!(status.state(), PowerState::Unknown);
        assert_eq!(status.token(), Some("standby"));
    }

    #[tokio::test]
    async fn test_power_on_then_status() {
        let driver = BladeCenterDriver::default();
        let target = target("3");
        let mut session = ScriptedSession::new()
            .reply("system:blade[3]>")
            .reply("power -on\r\nOK\r\nsystem:blade[3]>")
            .reply("system>")
            .reply("system:blade[3]>")
            .reply("power -state\r\nOn\r\nsystem:blade[3]>")
            .reply("system>");

        driver
            .apply_state(&mut session, &target, PowerState::On)
            .await
            .unwrap();
        assert_eq!(
            session.sent(),
            vec!["env -T system:blade[3]", "power -on", "env -T system"]
        );

        let status = driver.query_status(&mut session, &target).await.unwrap();
        assert_eq!(status.state(), PowerState::On);

        let timeouts = session.timeouts();
        assert_eq!(timeouts[1], target.timeouts.power);
        assert_eq!(timeouts[4], target.timeouts.shell);
    }

    #[tokio::test]
    async fn test_close_mid_sequence_is_connection_lost() {
        let mut session = ScriptedSession::new()
            .reply("system:blade[2]>")
            .close_channel();

        let err = BladeCenterDriver::default()
            .query_status(&mut session, &target("2"))
            .await
            .unwrap_err();
        assert_eq!(err.fault_kind(), Some(FaultKind::ConnectionLost));
        // No restore attempt after the fault.
        assert_eq!(session.sent(), vec!["env -T system:blade[2]", "power -state"]);
    }

    #[tokio::test]
    async fn test_missing_blade_prompt_times_out() {
        // Unknown blade: the chassis refuses and stays at "system>".
        let mut session = ScriptedSession::new().reply("Invalid target path\r\nsystem>");

        let err = BladeCenterDriver::default()
            .query_status(&mut session, &target("15"))
            .await
            .unwrap_err();
        assert_eq!(err.fault_kind(), Some(FaultKind::TimedOut));
        assert_eq!(session.sent(), vec!["env -T system:blade[15]"]);
    }

    #[tokio::test]
    async fn test_requires_plug() {
        let target = Target::for_test(&["system>"], Some("USERID"), None);
        let mut session = ScriptedSession::new();
        assert!(
            BladeCenterDriver::default()
                .query_status(&mut session, &target)
                .await
                .is_err()
        );
        assert!(session.sent().is_empty());
    }
}
