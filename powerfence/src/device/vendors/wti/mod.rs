//! WTI outlet strip support (RSM, MPC, IPS, TPS, NBB and NPS series).
//!
//! Tested models answer with a prompt naming their series. The IPS-800
//! has no user accounts and asks only for a password.

mod driver;
pub mod outlet_table;

pub use driver::{PASSWORD_ONLY_PROMPT, WtiDriver};

use std::sync::Arc;

use crate::device::DeviceDefinition;

/// Device name for WTI outlet strips.
pub const DEVICE_NAME: &str = "wti";

/// Create the WTI device definition.
pub fn device() -> DeviceDefinition {
    DeviceDefinition::new(DEVICE_NAME, Arc::new(WtiDriver::default()))
        .with_description("WTI network power switch")
        .with_prompt("RSM>")
        .with_prompt("MPC>")
        .with_prompt("IPS>")
        .with_prompt("TPS>")
        .with_prompt("NBB>")
        .with_prompt("NPS>")
        .with_logout("/X")
        .with_plug_required()
        .with_optional_login()
}
