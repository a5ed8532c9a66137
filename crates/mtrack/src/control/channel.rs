// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reliable control channel: command/response correlation over TCP.
//!
//! One command may be in flight at a time. While waiting for a reply, any
//! `msg` line arriving on the stream is decoded and pushed onto the
//! message queue; lines that fit no recognized shape are queued raw so
//! nothing from the device is ever dropped. Replies are never pipelined,
//! so classification needs no look-ahead across lines.

use super::messages::{EventMessage, MessageQueue};
use super::{CommandResponse, ControlError};
use crate::config::MAX_COMMAND_LEN;
use crate::parser::{match_parameter_echo, next_word, quoted_text};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// Protocol name token prefixing every command and reply line.
const PROTOCOL_PREFIX: &str = "dtrack2";

/// TCP control channel to the tracking controller.
pub struct ControlChannel {
    reader: BufReader<TcpStream>,
    peer: SocketAddr,
    messages: MessageQueue,
    /// Code and description of the last `err` reply, retained until the
    /// next command resolves.
    last_device_error: Option<(i32, String)>,
}

impl ControlChannel {
    /// Connect to the controller's command port.
    pub fn connect(addr: SocketAddr, timeout: Duration) -> Result<Self, ControlError> {
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        log::debug!("[CTRL] connected peer={}", addr);
        Ok(Self {
            reader: BufReader::new(stream),
            peer: addr,
            messages: MessageQueue::new(),
            last_device_error: None,
        })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Replace the per-read timeout for subsequent commands.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<(), ControlError> {
        self.reader.get_ref().set_read_timeout(Some(timeout))?;
        self.reader.get_ref().set_write_timeout(Some(timeout))?;
        Ok(())
    }

    /// Access the queue of asynchronous event messages.
    pub fn messages(&mut self) -> &mut MessageQueue {
        &mut self.messages
    }

    /// The last device-reported error, if the most recent command was
    /// answered with an `err` line.
    pub fn last_device_error(&self) -> Option<(i32, &str)> {
        self.last_device_error
            .as_ref()
            .map(|(code, desc)| (*code, desc.as_str()))
    }

    /// Send one command line and read lines until its correlated reply.
    ///
    /// `msg` lines observed while waiting are shunted to the queue and the
    /// wait continues. An `err` reply resolves the command successfully at
    /// the channel level; the device error is carried in the response and
    /// retained for [`Self::last_device_error`].
    pub fn send_command(&mut self, command: &str) -> Result<CommandResponse, ControlError> {
        self.write_line(command)?;
        self.last_device_error = None;
        loop {
            let line = self.read_line()?;
            match self.classify_line(&line) {
                LineKind::Ack => {
                    log::debug!("[CTRL] command ok cmd={:?}", command);
                    return Ok(CommandResponse::Ok);
                }
                LineKind::DeviceError { code, description } => {
                    log::debug!("[CTRL] command err cmd={:?} code={}", command, code);
                    self.last_device_error = Some((code, description.clone()));
                    return Ok(CommandResponse::DeviceError { code, description });
                }
                LineKind::Answer(text) => {
                    return Ok(CommandResponse::Answer(text));
                }
                LineKind::Message => continue,
            }
        }
    }

    /// Ask the controller for the next stored event message.
    ///
    /// Unlike [`Self::send_command`] this reads exactly one line: the
    /// reply to this request IS a `msg` line, so the usual read loop
    /// would shunt it to the queue and keep waiting forever.
    pub fn request_message(&mut self) -> Result<Option<EventMessage>, ControlError> {
        self.write_line("dtrack2 getmsg")?;
        let line = self.read_line()?;
        match self.classify_line(&line) {
            LineKind::Message => Ok(self.messages.poll()),
            // `ok` means no message is pending on the device side.
            LineKind::Ack => Ok(None),
            LineKind::DeviceError { code, description } => {
                self.last_device_error = Some((code, description));
                Ok(None)
            }
            LineKind::Answer(text) => Err(ControlError::Protocol(text)),
        }
    }

    /// Query one device parameter; returns its value string.
    pub fn get_param(&mut self, param: &str) -> Result<String, ControlError> {
        let command = format!("dtrack2 get {}", param);
        match self.send_command(&command)? {
            CommandResponse::Answer(answer) => {
                // Reply shape: `set <param> <value>` with the parameter
                // echoed back. Compare whitespace/zero-insensitively.
                let expected = format!("set {}", param);
                match_parameter_echo(&answer, &expected)
                    .map(str::to_owned)
                    .ok_or(ControlError::Protocol(answer))
            }
            CommandResponse::Ok => Err(ControlError::Protocol("ok".into())),
            CommandResponse::DeviceError { code, description } => {
                Err(ControlError::Device { code, description })
            }
        }
    }

    /// Set one device parameter.
    pub fn set_param(&mut self, param: &str, value: &str) -> Result<(), ControlError> {
        let command = format!("dtrack2 set {} {}", param, value);
        match self.send_command(&command)? {
            CommandResponse::Ok => Ok(()),
            CommandResponse::DeviceError { code, description } => {
                Err(ControlError::Device { code, description })
            }
            CommandResponse::Answer(text) => Err(ControlError::Protocol(text)),
        }
    }

    /// Start continuous measurement and data output.
    pub fn start_measurement(&mut self) -> Result<(), ControlError> {
        self.expect_ok("dtrack2 tracking start")
    }

    /// Stop measurement and data output.
    pub fn stop_measurement(&mut self) -> Result<(), ControlError> {
        self.expect_ok("dtrack2 tracking stop")
    }

    fn expect_ok(&mut self, command: &str) -> Result<(), ControlError> {
        match self.send_command(command)? {
            CommandResponse::Ok => Ok(()),
            CommandResponse::DeviceError { code, description } => {
                Err(ControlError::Device { code, description })
            }
            CommandResponse::Answer(text) => Err(ControlError::Protocol(text)),
        }
    }

    /// Orderly teardown; both stream directions are shut down.
    pub fn close(&mut self) {
        let _ = self.reader.get_ref().shutdown(Shutdown::Both);
        log::debug!("[CTRL] closed peer={}", self.peer);
    }

    fn write_line(&mut self, command: &str) -> Result<(), ControlError> {
        if command.len() > MAX_COMMAND_LEN {
            return Err(ControlError::TooLong(command.len()));
        }
        let stream = self.reader.get_mut();
        stream.write_all(command.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        Ok(())
    }

    /// Read one line; EOF means the controller closed the channel.
    fn read_line(&mut self) -> Result<String, ControlError> {
        let mut line = String::new();
        let n = self.reader.read_line(&mut line).map_err(|err| {
            match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => ControlError::Timeout,
                _ => ControlError::Io(err),
            }
        })?;
        if n == 0 {
            return Err(ControlError::Closed);
        }
        // The device may terminate lines with \r\n or a stray NUL.
        Ok(line.trim_end_matches(['\n', '\r', '\0']).to_owned())
    }

    fn classify_line(&mut self, line: &str) -> LineKind {
        // The protocol token must be a whole word: "dtrack2ok" is not a reply.
        let rest = match line.strip_prefix(PROTOCOL_PREFIX) {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest,
            _ => {
                // Not protocol-shaped; keep it rather than losing it.
                self.messages.push(raw_message(line));
                return LineKind::Message;
            }
        };
        let rest = rest.trim_start();
        if rest == "ok" {
            return LineKind::Ack;
        }
        if let Some(tail) = rest.strip_prefix("err ") {
            if let Some((code, description)) = decode_error_tail(tail) {
                return LineKind::DeviceError { code, description };
            }
        }
        if let Some(tail) = rest.strip_prefix("msg ") {
            match EventMessage::decode(tail) {
                Some(msg) => self.messages.push(msg),
                None => self.messages.push(raw_message(line)),
            }
            return LineKind::Message;
        }
        LineKind::Answer(rest.to_owned())
    }
}

impl Drop for ControlChannel {
    fn drop(&mut self) {
        self.close();
    }
}

enum LineKind {
    Ack,
    DeviceError { code: i32, description: String },
    Answer(String),
    Message,
}

/// Decode `<code> "<description>"`.
fn decode_error_tail(tail: &str) -> Option<(i32, String)> {
    let (code_tok, rest) = next_word(tail)?;
    let code = code_tok.parse().ok()?;
    let (description, _) = quoted_text(rest)?;
    Some((code, description.to_owned()))
}

/// Wrap an unclassifiable line so it survives in the queue.
fn raw_message(line: &str) -> EventMessage {
    EventMessage {
        origin: String::new(),
        status: "raw".to_owned(),
        frame_nr: 0,
        error_id: 0,
        message: line.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_tail_decodes_code_and_text() {
        let (code, desc) = decode_error_tail("12 \"bad parameter\"").unwrap();
        assert_eq!(code, 12);
        assert_eq!(desc, "bad parameter");
        assert!(decode_error_tail("nope").is_none());
    }
}
