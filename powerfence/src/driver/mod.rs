//! Power drivers and the caller-facing fencer.
//!
//! The driver layer turns "read power state" / "set power state" into a
//! vendor's command sequence, waits for the reply and parses it. Transport
//! faults are classified at every call site and returned immediately; a
//! driver never retries and never closes the session.

mod builder;
mod commands;
mod context;
mod dialog;
mod fencer;
mod target;

pub use builder::FenceBuilder;
pub use commands::{CommandSet, PLUG_PLACEHOLDER};
pub use context::ContextScope;
pub use dialog::{
    Dialog, DialogBuilder, DialogBuilderWithInput, DialogResult, DialogStep, Input,
    LOGIN_PROMPT, PASSWORD_PROMPT, login,
};
pub(crate) use dialog::password_of;
pub use fencer::{ActionOutcome, Fencer};
pub use target::{Target, Timeouts};

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};

use crate::channel::{Expectation, PromptSet, Session};
use crate::classify::{Phase, classify};
use crate::error::Result;
use crate::status::{PowerState, PowerStatus};

/// Trait for vendor power drivers.
#[async_trait]
pub trait PowerDriver: Send + Sync {
    /// Read the target's power status.
    ///
    /// Output the driver cannot interpret is returned as data
    /// ([`PowerStatus::NotFound`] / [`PowerStatus::Unparseable`]), not as an
    /// error.
    async fn query_status(&self, session: &mut dyn Session, target: &Target)
    -> Result<PowerStatus>;

    /// Request a power transition.
    ///
    /// Returns once the device acknowledged the command; the new state is
    /// not read back.
    async fn apply_state(
        &self,
        session: &mut dyn Session,
        target: &Target,
        desired: PowerState,
    ) -> Result<()>;

    /// Bring a freshly connected session to the command prompt.
    async fn login(&self, session: &mut dyn Session, target: &Target) -> Result<()> {
        dialog::login(session, target).await
    }
}

/// Send one command and wait for one of `prompts`, in the command phase.
pub async fn exchange(
    session: &mut dyn Session,
    command: &str,
    prompts: &PromptSet,
    timeout: Duration,
) -> Result<Expectation> {
    debug!("Sending {:?}", command);
    session
        .send_line(command)
        .await
        .map_err(|e| classify(e, Phase::Command))?;

    let reply = session
        .expect(prompts, timeout)
        .await
        .map_err(|e| classify(e, Phase::Command))?;
    trace!("Captured {:?}", reply.before);
    Ok(reply)
}
