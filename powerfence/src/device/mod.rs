//! Device definitions for multi-vendor support.
//!
//! A device definition ties a power driver to its default prompts, logout
//! command and login requirements.

mod definition;
mod registry;
pub mod vendors;

pub use definition::DeviceDefinition;
pub use registry::DeviceRegistry;
