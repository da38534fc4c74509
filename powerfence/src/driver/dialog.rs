//! Scripted send/expect dialogs, used for logging in.
//!
//! A dialog is a sequence of steps. Each step optionally sends an input,
//! then waits for one of a set of prompts. Inputs marked hidden (passwords)
//! are never written to the log.
//!
//! Dialogs run in a [`Phase`], so a fault halfway through a login is
//! reported as [`FaultKind::LoginDenied`](crate::FaultKind::LoginDenied)
//! rather than as a lost connection or timeout.

use std::time::{Duration, Instant};

use log::{debug, trace};
use secrecy::{ExposeSecret, SecretString};

use super::target::Target;
use crate::channel::{Expectation, PromptSet, Session};
use crate::classify::{Phase, classify};
use crate::error::{ChannelError, DriverError, Result};

/// Login-name prompts accepted by the generic login.
pub const LOGIN_PROMPT: &str = r"(?i)(login|login name|username|user name)\s*:\s?";

/// Password prompt accepted by the generic login.
pub const PASSWORD_PROMPT: &str = r"(?i)password\s*:\s?";

/// What a step sends before waiting.
#[derive(Debug)]
pub enum Input {
    /// Logged as-is.
    Text(String),

    /// Masked in logs.
    Secret(SecretString),
}

impl Input {
    fn expose(&self) -> &str {
        match self {
            Input::Text(text) => text,
            Input::Secret(secret) => secret.expose_secret(),
        }
    }

    fn for_log(&self) -> &str {
        match self {
            Input::Text(text) => text,
            Input::Secret(_) => "********",
        }
    }
}

/// A single step of a dialog.
#[derive(Debug)]
pub struct DialogStep {
    /// Line to send first, if any.
    pub input: Option<Input>,

    /// Prompts to wait for.
    pub expect: PromptSet,

    /// How long to wait.
    pub timeout: Duration,
}

/// Result of a dialog.
#[derive(Debug, Clone)]
pub struct DialogResult {
    /// Output captured by each step.
    pub steps: Vec<Expectation>,

    /// Total time for the entire dialog.
    pub elapsed: Duration,
}

impl DialogResult {
    /// The output captured by the last step.
    pub fn final_output(&self) -> Option<&Expectation> {
        self.steps.last()
    }
}

/// An ordered send/expect dialog.
#[derive(Debug, Default)]
pub struct Dialog {
    steps: Vec<DialogStep>,
}

impl Dialog {
    pub fn steps(&self) -> &[DialogStep] {
        &self.steps
    }

    /// Run every step in order, classifying faults for `phase`.
    pub async fn run(&self, session: &mut dyn Session, phase: Phase) -> Result<DialogResult> {
        let start = Instant::now();
        let mut captured = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            if let Some(input) = &step.input {
                debug!("Sending {:?}", input.for_log());
                session
                    .send_line(input.expose())
                    .await
                    .map_err(|e| classify(e, phase))?;
            }

            let reply = session
                .expect(&step.expect, step.timeout)
                .await
                .map_err(|e| classify(e, phase))?;
            trace!("Dialog step matched {:?}", reply.matched);
            captured.push(reply);
        }

        Ok(DialogResult {
            steps: captured,
            elapsed: start.elapsed(),
        })
    }
}

/// Builder for dialogs.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use powerfence::channel::PromptSet;
/// use powerfence::driver::DialogBuilder;
///
/// # fn main() -> Result<(), regex::Error> {
/// let dialog = DialogBuilder::new()
///     .with_timeout(Duration::from_secs(5))
///     .wait_for(PromptSet::single("Password: ")?)
///     .send("secret")
///     .expect(PromptSet::single("IPS>")?)
///     .build();
/// assert_eq!(dialog.steps().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DialogBuilder {
    steps: Vec<DialogStep>,
    default_timeout: Duration,
}

impl Default for DialogBuilder {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            default_timeout: Duration::from_secs(5),
        }
    }
}

impl DialogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for steps added after this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Wait for prompts without sending anything.
    pub fn wait_for(mut self, prompts: PromptSet) -> Self {
        self.steps.push(DialogStep {
            input: None,
            expect: prompts,
            timeout: self.default_timeout,
        });
        self
    }

    /// Add an input to send.
    ///
    /// Must be followed by `expect()` to specify what to wait for.
    pub fn send(self, input: impl Into<String>) -> DialogBuilderWithInput {
        DialogBuilderWithInput {
            builder: self,
            input: Input::Text(input.into()),
        }
    }

    /// Add a secret input (like a password).
    pub fn send_secret(self, secret: SecretString) -> DialogBuilderWithInput {
        DialogBuilderWithInput {
            builder: self,
            input: Input::Secret(secret),
        }
    }

    pub fn build(self) -> Dialog {
        Dialog { steps: self.steps }
    }
}

/// Intermediate state for the builder after `send()` is called.
#[derive(Debug)]
pub struct DialogBuilderWithInput {
    builder: DialogBuilder,
    input: Input,
}

impl DialogBuilderWithInput {
    /// Specify the prompts to wait for after sending the input.
    pub fn expect(mut self, prompts: PromptSet) -> DialogBuilder {
        self.builder.steps.push(DialogStep {
            input: Some(self.input),
            expect: prompts,
            timeout: self.builder.default_timeout,
        });
        self.builder
    }
}

/// Copy the target's credential for a dialog step.
pub(crate) fn password_of(target: &Target) -> SecretString {
    SecretString::from(target.password.expose_secret().to_owned())
}

/// The generic login: login name, password, command prompt.
pub async fn login(session: &mut dyn Session, target: &Target) -> Result<()> {
    let user = target
        .login
        .as_deref()
        .ok_or_else(|| DriverError::InvalidConfig {
            message: "A login name is required for this device".to_string(),
        })?;

    let dialog = DialogBuilder::new()
        .with_timeout(target.timeouts.login)
        .wait_for(PromptSet::single(LOGIN_PROMPT).map_err(ChannelError::from)?)
        .send(user)
        .expect(PromptSet::single(PASSWORD_PROMPT).map_err(ChannelError::from)?)
        .send_secret(password_of(target))
        .expect(target.prompts.clone())
        .build();

    dialog.run(session, Phase::Login).await?;
    debug!("Logged in to {} as {}", target.address, user);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::mock::ScriptedSession;
    use crate::classify::FaultKind;
    use crate::driver::target::Timeouts;

    fn target(login: Option<&str>) -> Target {
        Target::for_test(&["system>"], login, Some("3"))
    }

    #[tokio::test]
    async fn test_generic_login() {
        let mut session = ScriptedSession::new()
            .reply("BladeCenter\r\nusername: ")
            .reply("admin\r\npassword: ")
            .reply("\r\nsystem>");

        login(&mut session, &target(Some("admin"))).await.unwrap();
        assert_eq!(session.sent(), vec!["admin", "s3cret"]);
        assert!(
            session
                .timeouts()
                .iter()
                .all(|t| *t == Timeouts::default().login)
        );
    }

    #[tokio::test]
    async fn test_login_requires_name() {
        let mut session = ScriptedSession::new();
        let err = login(&mut session, &target(None)).await.unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Driver(DriverError::InvalidConfig { .. })
        ));
        assert!(session.sent().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_password_is_login_denied() {
        // Wrong password: the device asks again instead of showing the prompt.
        let mut session = ScriptedSession::new()
            .reply("login: ")
            .reply("Password: ")
            .reply("Login incorrect\r\nlogin: ");

        let err = login(&mut session, &target(Some("admin"))).await.unwrap_err();
        assert_eq!(err.fault_kind(), Some(FaultKind::LoginDenied));
    }

    #[tokio::test]
    async fn test_close_during_login_is_login_denied() {
        let mut session = ScriptedSession::new().reply("login: ").close_channel();

        let err = login(&mut session, &target(Some("admin"))).await.unwrap_err();
        assert_eq!(err.fault_kind(), Some(FaultKind::LoginDenied));
    }

    #[tokio::test]
    async fn test_dialog_result() {
        let dialog = DialogBuilder::new()
            .wait_for(PromptSet::single("Password: ").unwrap())
            .send_secret(SecretString::from("pw".to_string()))
            .expect(PromptSet::new(["RSM>", "IPS>"]).unwrap())
            .build();
        let mut session = ScriptedSession::new()
            .reply("Password: ")
            .reply("\r\nIPS>");

        let result = dialog.run(&mut session, Phase::Login).await.unwrap();
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.final_output().unwrap().index, 1);
    }
}
