//! Connection configuration.

use std::time::Duration;

/// Default management console port.
pub const DEFAULT_PORT: u16 = 23;

/// Where and how long to try connecting.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// TCP port (default: 23).
    pub port: u16,

    /// Connection timeout.
    pub timeout: Duration,
}

impl ConnectConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
