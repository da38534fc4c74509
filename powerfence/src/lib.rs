//! # Powerfence
//!
//! Async power fencing drivers for out-of-band management consoles.
//!
//! Powerfence logs in to a power controller's text console, reads the power
//! state of one outlet or blade, and switches it on or off. Failures are
//! reported as one of three fault kinds (connection lost, timed out, login
//! denied) so an orchestrator can decide whether to retry or escalate.
//!
//! ## Features
//!
//! - Async send/expect sessions over any `AsyncRead + AsyncWrite` stream
//! - Prompt sets with "which alternative matched" reporting
//! - Terminal escape stripping via vte
//! - Built-in IBM BladeCenter, HP iLO and WTI outlet strip drivers
//! - Device registry for adding vendors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use powerfence::{FenceBuilder, PowerState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), powerfence::Error> {
//!     let fencer = FenceBuilder::new("bladecenter.example.com")
//!         .device("bladecenter")
//!         .username("USERID")
//!         .password("PASSW0RD")
//!         .plug("3")
//!         .build()?;
//!
//!     let mut session = fencer.open().await?;
//!     let status = fencer.status(&mut session).await;
//!     fencer.logout(&mut session).await;
//!
//!     if status?.state() == PowerState::On {
//!         println!("blade 3 is powered");
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod classify;
pub mod device;
pub mod driver;
pub mod error;
pub mod status;
pub mod transport;

// Re-export main types for convenience
pub use channel::{PromptSet, Session, StreamSession};
pub use classify::{FaultKind, Phase};
pub use device::{DeviceDefinition, DeviceRegistry};
pub use driver::{ActionOutcome, FenceBuilder, Fencer, PowerDriver, Target, Timeouts};
pub use error::Error;
pub use status::{FenceAction, PowerState, PowerStatus};
pub use transport::{ConnectConfig, TcpTransport};
