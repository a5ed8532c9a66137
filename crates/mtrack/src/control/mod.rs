// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control channel to the tracking controller.

mod channel;
mod messages;

pub use channel::ControlChannel;
pub use messages::{EventMessage, MessageQueue};

use std::fmt;
use std::io;

/// Resolution of one command on the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    /// Plain acknowledgement.
    Ok,
    /// The device rejected the command with a code and description.
    DeviceError { code: i32, description: String },
    /// A value-carrying reply (text after the protocol prefix).
    Answer(String),
}

/// Errors on the control channel.
#[derive(Debug)]
pub enum ControlError {
    /// No reply line within the configured command timeout. The channel
    /// stays usable for further commands.
    Timeout,
    /// The controller closed the stream; the channel must be
    /// re-established before further commands.
    Closed,
    /// Command text exceeds the protocol's length limit.
    TooLong(usize),
    /// A reply did not follow the documented grammar.
    Protocol(String),
    /// The device rejected a parameter operation.
    Device { code: i32, description: String },
    /// Stream-level failure.
    Io(io::Error),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "no reply within command timeout"),
            Self::Closed => write!(f, "connection closed by controller"),
            Self::TooLong(len) => write!(f, "command too long ({} bytes)", len),
            Self::Protocol(line) => write!(f, "unexpected reply: {:?}", line),
            Self::Device { code, description } => {
                write!(f, "device error {}: {}", code, description)
            }
            Self::Io(err) => write!(f, "stream error: {}", err),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ControlError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::Timeout,
            _ => Self::Io(err),
        }
    }
}

impl ControlError {
    /// Whether the channel can keep being used after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Closed | Self::Io(_))
    }
}
