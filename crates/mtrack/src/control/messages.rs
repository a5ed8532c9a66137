// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Asynchronous event/status messages and their FIFO queue.
//!
//! The controller pushes status lines over the same stream that carries
//! command replies. The channel's read loop shunts them here so a command
//! in flight never mistakes one for its reply and never drops one.

use crate::parser::{next_word, parse_uint_auto, quoted_text};
use std::collections::VecDeque;

/// One decoded event/status line from the controller.
///
/// Wire form: `dtrack2 msg <origin> <status> <frame> <hexid> "<text>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMessage {
    /// Subsystem that produced the message (e.g. a camera name).
    pub origin: String,
    /// Severity keyword as sent by the device (`info`, `warning`, `error`).
    pub status: String,
    /// Frame counter at the time the event occurred.
    pub frame_nr: u32,
    /// Device-defined numeric event id (sent as `0x...` hex).
    pub error_id: u32,
    /// Free-text description.
    pub message: String,
}

impl EventMessage {
    /// Decode the tail of a `msg` line (everything after the `msg` token).
    /// Returns `None` when the line does not follow the documented shape.
    pub(super) fn decode(tail: &str) -> Option<Self> {
        let (origin, rest) = next_word(tail)?;
        let (status, rest) = next_word(rest)?;
        let (frame_tok, rest) = next_word(rest)?;
        let frame_nr = frame_tok.parse().ok()?;
        let (id_tok, rest) = next_word(rest)?;
        let error_id = parse_uint_auto(id_tok)?;
        let (message, _) = quoted_text(rest)?;
        Some(Self {
            origin: origin.to_owned(),
            status: status.to_owned(),
            frame_nr,
            error_id,
            message: message.to_owned(),
        })
    }
}

/// FIFO of event messages, appended by the channel's read loop and
/// drained by the caller. Unbounded; a caller that never polls while
/// generating device chatter will grow it without limit.
#[derive(Debug, Default)]
pub struct MessageQueue {
    queue: VecDeque<EventMessage>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the oldest message, if any.
    pub fn poll(&mut self) -> Option<EventMessage> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(super) fn push(&mut self, msg: EventMessage) {
        log::debug!(
            "[CTRL] queued message origin={} status={} id={:#x}",
            msg.origin,
            msg.status,
            msg.error_id
        );
        self.queue.push_back(msg);
    }
}
