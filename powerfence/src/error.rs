//! Error types for powerfence.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::classify::FaultKind;

/// Main error type for powerfence operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A classified transport fault. Aborts the whole fencing operation.
    #[error("Fence fault: {0}")]
    Fault(FaultKind),

    /// Connection setup errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel errors that are not transport faults
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Device definition errors
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// The fault kind, if this error is a classified transport fault.
    pub fn fault_kind(&self) -> Option<FaultKind> {
        match self {
            Error::Fault(kind) => Some(*kind),
            _ => None,
        }
    }
}

/// Transport layer errors (establishing the connection).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connecting took longer than the login timeout
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },
}

/// Channel layer errors (send/expect on an open session).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No prompt pattern matched before the deadline
    #[error("Pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed by the peer, or a write could not be delivered
    #[error("Channel closed")]
    Closed,

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Driver layer errors (configuration of a fencing request).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Invalid configuration in the fence builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown action token
    #[error("Unknown action '{token}'")]
    UnknownAction { token: String },

    /// A power transition was requested with a state that is not on/off
    #[error("Cannot set power state to '{state}'")]
    UnsupportedState { state: String },
}

/// Device definition errors.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Invalid device definition
    #[error("Invalid device definition: {message}")]
    InvalidDefinition { message: String },

    /// No device registered under this name
    #[error("Unknown device '{name}'")]
    UnknownDevice { name: String },

    /// A device with this name is already registered
    #[error("Device '{name}' is already registered")]
    AlreadyRegistered { name: String },
}

/// Result type alias using powerfence's Error.
pub type Result<T> = std::result::Result<T, Error>;
