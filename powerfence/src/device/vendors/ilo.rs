//! HP iLO management processor support.
//!
//! The status reply contains a fixed phrase:
//!
//! ```text
//! </>hpiLO-> POWER
//! status=0
//! status_tag=COMMAND COMPLETED
//! server power is currently: On
//! </>hpiLO->
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use regex::Regex;

use crate::channel::Session;
use crate::device::DeviceDefinition;
use crate::driver::{CommandSet, PowerDriver, Target, exchange};
use crate::error::{ChannelError, Result};
use crate::status::{PowerState, PowerStatus};

/// Device name for HP iLO.
pub const DEVICE_NAME: &str = "ilo";

/// Captures the text after the status label, up to end of line.
pub const STATUS_PATTERN: &str = r"(?i)server power is currently:[ \t]*([^\r\n]*)";

/// Driver extracting the power state from a labelled status line.
#[derive(Debug, Clone)]
pub struct IloDriver {
    commands: CommandSet,
    status_pattern: Regex,
}

impl IloDriver {
    pub fn new(commands: CommandSet, status_pattern: &str) -> Result<Self> {
        Ok(Self {
            commands,
            status_pattern: Regex::new(status_pattern).map_err(ChannelError::from)?,
        })
    }

    /// Pull the status token out of a reply.
    pub fn extract_status(&self, output: &str) -> PowerStatus {
        match self
            .status_pattern
            .captures(output)
            .and_then(|caps| caps.get(1))
            .filter(|token| !token.as_str().trim().is_empty())
        {
            Some(token) => PowerStatus::reported(token.as_str()),
            None => PowerStatus::unparseable("no power status line in reply"),
        }
    }
}

impl Default for IloDriver {
    fn default() -> Self {
        Self {
            commands: CommandSet::new("POWER", "power on", "power off"),
            status_pattern: Regex::new(STATUS_PATTERN).expect("status pattern is valid"),
        }
    }
}

#[async_trait]
impl PowerDriver for IloDriver {
    async fn query_status(
        &self,
        session: &mut dyn Session,
        target: &Target,
    ) -> Result<PowerStatus> {
        let plug = target.plug.as_deref().unwrap_or_default();
        let reply = exchange(
            session,
            &self.commands.status_for(plug),
            &target.prompts,
            target.timeouts.shell,
        )
        .await?;

        let status = self.extract_status(&reply.before);
        debug!("Server power status: {}", status);
        Ok(status)
    }

    async fn apply_state(
        &self,
        session: &mut dyn Session,
        target: &Target,
        desired: PowerState,
    ) -> Result<()> {
        let plug = target.plug.as_deref().unwrap_or_default();
        let command = self.commands.power_for(desired, plug)?;
        info!("Switching server {} {}", target.address, desired);
        exchange(session, &command, &target.prompts, target.timeouts.power).await?;
        Ok(())
    }
}

/// Create the iLO device definition.
pub fn device() -> DeviceDefinition {
    DeviceDefinition::new(DEVICE_NAME, Arc::new(IloDriver::default()))
        .with_description("HP Integrated Lights-Out")
        .with_prompt("</>hpiLO->")
        .with_logout("quit")
}
