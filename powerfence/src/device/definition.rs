//! Device definition for vendor-specific configuration.

use std::fmt;
use std::sync::Arc;

use crate::channel::PromptSet;
use crate::driver::PowerDriver;
use crate::transport::config::DEFAULT_PORT;

/// Device definition containing all vendor-specific configuration.
#[derive(Clone)]
pub struct DeviceDefinition {
    /// Device name (e.g., "bladecenter", "ilo", "wti").
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Prompt patterns used when the caller does not supply any.
    pub default_prompts: Vec<String>,

    /// Command sent before the session is closed.
    pub logout_command: String,

    /// Default console port.
    pub default_port: u16,

    /// Whether requests must name an outlet/blade.
    pub requires_plug: bool,

    /// Whether the device can be used without a login name.
    pub login_optional: bool,

    /// The power driver.
    pub driver: Arc<dyn PowerDriver>,
}

impl DeviceDefinition {
    /// Create a new device definition with minimal required fields.
    pub fn new(name: impl Into<String>, driver: Arc<dyn PowerDriver>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default_prompts: vec![],
            logout_command: "exit".to_string(),
            default_port: DEFAULT_PORT,
            requires_plug: false,
            login_optional: false,
            driver,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a default prompt pattern.
    pub fn with_prompt(mut self, pattern: impl Into<String>) -> Self {
        self.default_prompts.push(pattern.into());
        self
    }

    /// Set the logout command.
    pub fn with_logout(mut self, command: impl Into<String>) -> Self {
        self.logout_command = command.into();
        self
    }

    /// Set the default console port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.default_port = port;
        self
    }

    /// Require an outlet/blade identifier.
    pub fn with_plug_required(mut self) -> Self {
        self.requires_plug = true;
        self
    }

    /// Allow connecting without a login name.
    pub fn with_optional_login(mut self) -> Self {
        self.login_optional = true;
        self
    }

    /// Compile the default prompts.
    pub fn prompts(&self) -> Result<PromptSet, regex::Error> {
        PromptSet::new(&self.default_prompts)
    }
}

impl fmt::Debug for DeviceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("default_prompts", &self.default_prompts)
            .field("logout_command", &self.logout_command)
            .field("default_port", &self.default_port)
            .field("requires_plug", &self.requires_plug)
            .field("login_optional", &self.login_optional)
            .field("driver", &"<PowerDriver>")
            .finish()
    }
}
