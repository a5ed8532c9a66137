// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Network transports: UDP data channel and its error type.

mod udp;

pub use udp::DataTransport;

use std::fmt;
use std::io;

/// Errors surfaced by the data transport.
#[derive(Debug)]
pub enum TransportError {
    /// No datagram arrived within the configured timeout.
    Timeout,
    /// A datagram filled the receive buffer completely, so it was
    /// likely truncated. Raise the configured buffer size.
    BufferTooSmall { buffer_size: usize },
    /// Underlying socket error.
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "receive timed out"),
            Self::BufferTooSmall { buffer_size } => {
                write!(f, "datagram exceeds receive buffer ({} bytes)", buffer_size)
            }
            Self::Io(err) => write!(f, "socket error: {}", err),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Io(err),
        }
    }
}

impl TransportError {
    /// Whether this error is a plain timeout (no data, channel healthy).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
