//! The caller-facing fencer.

use log::{debug, info, warn};
use tokio::net::TcpStream;

use super::target::Target;
use crate::channel::{Session, StreamSession};
use crate::classify::{Phase, classify};
use crate::device::DeviceDefinition;
use crate::error::{DriverError, Result};
use crate::status::{FenceAction, PowerState, PowerStatus};
use crate::transport::{ConnectConfig, TcpTransport};

/// A fencing target bound to its device definition.
///
/// The fencer does not own a session. The caller connects (or brings its
/// own [`Session`]), logs in, runs status/transition requests and finally
/// calls [`logout`](Self::logout), whatever the outcome of the requests.
///
/// # Example
///
/// ```rust,no_run
/// use powerfence::{FenceBuilder, PowerState};
///
/// # async fn example() -> Result<(), powerfence::Error> {
/// let fencer = FenceBuilder::new("pdu1.example.com")
///     .device("wti")
///     .password("secret")
///     .plug("4")
///     .build()?;
///
/// let mut session = fencer.connect().await?;
/// fencer.login(&mut session).await?;
/// let result = fencer.set_power(&mut session, PowerState::Off).await;
/// fencer.logout(&mut session).await;
/// result?;
/// # Ok(())
/// # }
/// ```
/// What [`Fencer::perform`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A status query ran (`status` and `monitor`).
    Status(PowerStatus),

    /// The device acknowledged a power transition.
    Acknowledged(PowerState),
}

#[derive(Debug)]
pub struct Fencer {
    target: Target,
    device: DeviceDefinition,
}

impl Fencer {
    /// Create a new fencer.
    pub fn new(target: Target, device: DeviceDefinition) -> Self {
        Self { target, device }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn device(&self) -> &DeviceDefinition {
        &self.device
    }

    /// Open a TCP session to the device.
    pub async fn connect(&self) -> Result<StreamSession<TcpStream>> {
        TcpTransport::connect(&ConnectConfig {
            host: self.target.address.clone(),
            port: self.target.port,
            timeout: self.target.timeouts.login,
        })
        .await
    }

    /// Bring the session to the command prompt.
    pub async fn login(&self, session: &mut dyn Session) -> Result<()> {
        self.device.driver.login(session, &self.target).await
    }

    /// Connect and log in.
    pub async fn open(&self) -> Result<StreamSession<TcpStream>> {
        let mut session = self.connect().await?;
        self.login(&mut session).await?;
        Ok(session)
    }

    /// Read the target's power status.
    pub async fn status(&self, session: &mut dyn Session) -> Result<PowerStatus> {
        self.device
            .driver
            .query_status(session, &self.target)
            .await
    }

    /// Request a power transition.
    pub async fn set_power(&self, session: &mut dyn Session, state: PowerState) -> Result<()> {
        info!(
            "Requesting power {} on {} ({})",
            state, self.target.address, self.device.name
        );
        self.device
            .driver
            .apply_state(session, &self.target, state)
            .await
    }

    /// Run the target's requested action.
    ///
    /// `reboot` is an off/on cycle driven by the orchestrator and is
    /// rejected here without sending anything.
    pub async fn perform(&self, session: &mut dyn Session) -> Result<ActionOutcome> {
        match self.target.action {
            FenceAction::Status | FenceAction::Monitor => {
                Ok(ActionOutcome::Status(self.status(session).await?))
            }
            FenceAction::On => self.switch(session, PowerState::On).await,
            FenceAction::Off => self.switch(session, PowerState::Off).await,
            FenceAction::Reboot => Err(DriverError::InvalidConfig {
                message: "reboot is an off/on cycle; request off, then on".to_string(),
            }
            .into()),
        }
    }

    async fn switch(&self, session: &mut dyn Session, state: PowerState) -> Result<ActionOutcome> {
        self.set_power(session, state).await?;
        Ok(ActionOutcome::Acknowledged(state))
    }

    /// Send the device's logout command and close the session.
    ///
    /// Failures are logged; the session is closed regardless.
    pub async fn logout(&self, session: &mut dyn Session) {
        debug!("Sending {:?}", self.device.logout_command);
        if let Err(e) = session.send_line(&self.device.logout_command).await {
            warn!(
                "Logout from {} failed: {}",
                self.target.address,
                classify(e, Phase::Command)
            );
        }
        if let Err(e) = session.close().await {
            warn!("Closing session to {} failed: {}", self.target.address, e);
        }
    }
}
