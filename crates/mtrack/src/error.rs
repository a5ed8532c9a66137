// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types and per-channel outcome classification.

use crate::control::ControlError;
use crate::parser::ParseError;
use crate::transport::TransportError;
use std::fmt;

/// Classification of the most recent operation on one channel.
///
/// The tracker keeps one slot for the data channel and one for the control
/// channel. Each operation on a channel overwrites that channel's slot; a
/// successful operation writes [`ChannelStatus::None`], so a stale error is
/// never reported as current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelStatus {
    /// Last operation succeeded.
    #[default]
    None,
    /// No data arrived within the configured interval.
    Timeout,
    /// Socket or stream level failure, including an oversized payload.
    Transport,
    /// Transport delivered data, but the protocol content was malformed.
    Parse,
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// Errors returned by tracker operations.
#[derive(Debug)]
pub enum Error {
    /// Data channel transport failure (timeout, oversized payload, socket).
    Transport(TransportError),
    /// Tracking data payload was malformed; the previous frame snapshot is
    /// retained.
    Parse(ParseError),
    /// Control channel failure.
    Control(ControlError),
    /// No control channel is configured (listening-only mode), or the
    /// connection was closed and not re-established.
    NoControlChannel,
    /// A locally rejected argument (e.g. feedback strength outside [0, 1]).
    InvalidArgument(&'static str),
    /// Invalid configuration.
    Config(&'static str),
    /// Controller address could not be resolved.
    BadAddress(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "data channel: {}", e),
            Self::Parse(e) => write!(f, "frame parse: {}", e),
            Self::Control(e) => write!(f, "control channel: {}", e),
            Self::NoControlChannel => write!(f, "no control channel available"),
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Self::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Self::BadAddress(addr) => write!(f, "cannot resolve controller address: {}", addr),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Control(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<ControlError> for Error {
    fn from(e: ControlError) -> Self {
        Self::Control(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_none() {
        assert_eq!(ChannelStatus::default(), ChannelStatus::None);
    }

    #[test]
    fn display_is_stable() {
        assert_eq!(ChannelStatus::Timeout.to_string(), "timeout");
        assert_eq!(
            Error::NoControlChannel.to_string(),
            "no control channel available"
        );
    }
}
