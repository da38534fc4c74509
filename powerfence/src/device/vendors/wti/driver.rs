//! WTI outlet strip driver.

use async_trait::async_trait;
use log::{debug, info};

use super::outlet_table;
use crate::channel::{PromptSet, Session};
use crate::classify::Phase;
use crate::driver::{
    CommandSet, DialogBuilder, PowerDriver, Target, exchange, login as generic_login,
    password_of,
};
use crate::error::{ChannelError, Result};
use crate::status::{PowerState, PowerStatus};

/// Password prompt shown by strips without user accounts.
pub const PASSWORD_ONLY_PROMPT: &str = "Password: ";

/// Driver for multi-outlet strips with a tabular status listing.
#[derive(Debug, Clone)]
pub struct WtiDriver {
    commands: CommandSet,
}

impl WtiDriver {
    pub fn new(commands: CommandSet) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }
}

impl Default for WtiDriver {
    fn default() -> Self {
        // ",y" answers the confirmation question up front.
        Self::new(CommandSet::new("/S", "/on {plug},y", "/off {plug},y"))
    }
}

#[async_trait]
impl PowerDriver for WtiDriver {
    async fn query_status(
        &self,
        session: &mut dyn Session,
        target: &Target,
    ) -> Result<PowerStatus> {
        let plug = target.plug()?;
        let reply = exchange(
            session,
            &self.commands.status_for(plug),
            &target.prompts,
            target.timeouts.shell,
        )
        .await?;
        debug!(
            "Outlet listing ended with prompt {:?}",
            target.prompts.pattern(reply.index).unwrap_or_default()
        );

        let status = outlet_table::find_plug_status(&reply.before, plug);
        debug!("Plug {} status: {}", plug, status);
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
        info!("Switching plug {} {}", plug, desired);
        exchange(session, &command, &target.prompts, target.timeouts.power).await?;
        Ok(())
    }

    /// Strips without user accounts only ask for a password.
    async fn login(&self, session: &mut dyn Session, target: &Target) -> Result<()> {
        if target.login.is_some() {
            return generic_login(session, target).await;
        }

        let dialog = DialogBuilder::new()
            .with_timeout(target.timeouts.login)
            .wait_for(PromptSet::literal(PASSWORD_ONLY_PROMPT).map_err(ChannelError::from)?)
            .send_secret(password_of(target))
            .expect(target.prompts.clone())
            .build();

        dialog.run(session, Phase::Login).await?;
        debug!("Logged in to {} with password only", target.address);
        Ok(())
    }
}
