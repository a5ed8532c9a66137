// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tokenizer and record decoders for the tracking data channel.

mod frame;
mod scan;

pub use frame::decode_frame;
pub use scan::{
    is_numeric, match_parameter_echo, next_word, parse_uint_auto, quoted_text, Scanner,
};

use std::fmt;

/// Hard decode failure for one payload.
///
/// Any of these leaves the frame store untouched and classifies the data
/// channel as `Parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Payload ended where a required field was expected.
    UnexpectedEnd(&'static str),
    /// A required numeric field did not parse as a number.
    InvalidNumber(String),
    /// A declared count exceeds the wire-format capacity for its record.
    CountOutOfRange {
        /// Which count (e.g. "flystick buttons").
        what: &'static str,
        /// Declared count.
        count: usize,
        /// Capacity limit.
        max: usize,
    },
    /// A record id differs from its expected position.
    IdMismatch {
        /// Which record type.
        what: &'static str,
        /// Expected id (position in the group).
        expected: usize,
        /// Id found on the wire.
        found: usize,
    },
    /// Payload is not valid UTF-8 text.
    InvalidText,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd(field) => write!(f, "payload ended before {}", field),
            Self::InvalidNumber(tok) => write!(f, "invalid number: {:?}", tok),
            Self::CountOutOfRange { what, count, max } => {
                write!(f, "{} count {} exceeds capacity {}", what, count, max)
            }
            Self::IdMismatch {
                what,
                expected,
                found,
            } => write!(f, "{} id {} at position {}", what, found, expected),
            Self::InvalidText => write!(f, "payload is not valid text"),
        }
    }
}

impl std::error::Error for ParseError {}
