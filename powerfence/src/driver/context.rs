//! Scoped sub-unit contexts.
//!
//! Chassis managers address a blade by switching the console into that
//! blade's context; every following command applies to it until the outer
//! context is restored. The scope borrows the session mutably for its whole
//! lifetime, and [`leave`](ContextScope::leave) consumes it, so the restore
//! step can only run once.
//!
//! A fault inside the scope aborts the operation without restoring the outer
//! context. Dropping an unrestored scope logs a warning; no async cleanup is
//! attempted from `Drop`.

use std::time::Duration;

use log::{debug, warn};

use super::exchange;
use crate::channel::{Expectation, PromptSet, Session};
use crate::error::{ChannelError, Result};

/// An entered sub-unit context on a device console.
pub struct ContextScope<'a> {
    session: &'a mut dyn Session,
    name: String,
    scoped_prompt: PromptSet,
    exit_command: String,
    outer_prompts: &'a PromptSet,
    timeout: Duration,
    restored: bool,
}

impl<'a> ContextScope<'a> {
    /// Enter a context.
    ///
    /// Sends `enter_command` and waits for the literal `scoped_prompt`.
    pub async fn enter(
        session: &'a mut dyn Session,
        enter_command: &str,
        scoped_prompt: &str,
        exit_command: impl Into<String>,
        outer_prompts: &'a PromptSet,
        timeout: Duration,
    ) -> Result<Self> {
        let prompt = PromptSet::literal(scoped_prompt).map_err(ChannelError::from)?;
        exchange(&mut *session, enter_command, &prompt, timeout).await?;
        debug!("Entered context {:?}", scoped_prompt);

        Ok(Self {
            session,
            name: scoped_prompt.to_string(),
            scoped_prompt: prompt,
            exit_command: exit_command.into(),
            outer_prompts,
            timeout,
            restored: false,
        })
    }

    /// Send a command inside the context and capture its output.
    pub async fn send_command(&mut self, command: &str) -> Result<Expectation> {
        self.send_command_with_timeout(command, self.timeout).await
    }

    /// Send a command inside the context with a specific timeout.
    pub async fn send_command_with_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<Expectation> {
        exchange(&mut *self.session, command, &self.scoped_prompt, timeout).await
    }

    /// Restore the outer context.
    ///
    /// Consumes the scope; it cannot be used after this.
    pub async fn leave(mut self) -> Result<()> {
        exchange(
            &mut *self.session,
            &self.exit_command,
            self.outer_prompts,
            self.timeout,
        )
        .await?;
        self.restored = true;
        debug!("Left context {:?}", self.name);
        Ok(())
    }

    /// The prompt identifying this context.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        if !self.restored {
            warn!(
                "Context {:?} abandoned without restoring the outer context",
                self.name
            );
        }
    }
}
