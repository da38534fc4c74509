//! Connection setup.
//!
//! Devices are reached over a plain TCP stream that is handed to a
//! [`StreamSession`](crate::channel::StreamSession). Option negotiation and
//! encryption are left to whatever sits on the other side of the socket.

pub mod config;
mod tcp;

pub use config::ConnectConfig;
pub use tcp::TcpTransport;
