//! TCP connection setup.
//!
//! Telnet option negotiation is neither answered nor filtered. Devices that
//! refuse to proceed without it need a negotiating stream wrapped in a
//! [`StreamSession`] instead of [`TcpTransport`].

use log::debug;
use tokio::net::TcpStream;

use super::config::ConnectConfig;
use crate::channel::StreamSession;
use crate::error::{Result, TransportError};

/// Opens TCP connections to management consoles.
pub struct TcpTransport;

impl TcpTransport {
    /// Connect and wrap the socket in a session.
    pub async fn connect(config: &ConnectConfig) -> Result<StreamSession<TcpStream>> {
        debug!("Connecting to {}", config.socket_addr());

        let stream = tokio::time::timeout(
            config.timeout,
            TcpStream::connect((config.host.as_str(), config.port)),
        )
        .await
        .map_err(|_| TransportError::ConnectTimeout {
            host: config.host.clone(),
            port: config.port,
            timeout: config.timeout,
        })?
        .map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        // Consoles answer keystroke by keystroke; don't batch small writes.
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not disable Nagle: {}", e);
        }

        Ok(StreamSession::new(stream))
    }
}
