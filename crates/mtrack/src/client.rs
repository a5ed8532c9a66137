// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracker client facade.
//!
//! Owns the data transport, the parsed frame snapshot, the optional
//! control channel, and the per-channel error classification slots.
//! Single-threaded and blocking; both receive paths are bounded by
//! their configured timeouts.

use crate::config::Config;
use crate::control::{CommandResponse, ControlChannel, ControlError, EventMessage};
use crate::data::{
    Body, Flystick, Frame, Hand, Human, InertialBody, Marker, MeasurementRef, MeasurementTool,
    SystemStatus,
};
use crate::error::{ChannelStatus, Error};
use crate::parser::decode_frame;
use crate::transport::{DataTransport, TransportError};
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

/// Client for one tracking controller (or a bare data stream).
///
/// Constructed from a [`Config`]; with a server host the control channel
/// is connected eagerly, without one the tracker is data-only and every
/// control operation returns [`Error::NoControlChannel`].
pub struct Tracker {
    transport: DataTransport,
    buf: Vec<u8>,
    frame: Frame,
    control: Option<ControlChannel>,
    /// Controller address, kept for UDP feedback datagrams.
    remote_ip: Option<IpAddr>,
    data_status: ChannelStatus,
    control_status: ChannelStatus,
}

impl Tracker {
    /// Build a tracker from a validated configuration.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate().map_err(Error::Config)?;

        let transport = DataTransport::bind(
            config.data_port,
            config.multicast_group,
            config.data_timeout,
        )?;
        log::debug!(
            "[CLIENT] data channel up port={}",
            transport.local_port()?
        );

        let (control, remote_ip) = match &config.server_host {
            Some(host) => {
                let addr = resolve(host, config.command_port)?;
                let channel = ControlChannel::connect(addr, config.command_timeout)?;
                (Some(channel), Some(addr.ip()))
            }
            None => (None, None),
        };

        Ok(Self {
            transport,
            buf: vec![0; config.buffer_size],
            frame: Frame::new(),
            control,
            remote_ip,
            data_status: ChannelStatus::None,
            control_status: ChannelStatus::None,
        })
    }

    /// Data-only tracker listening on `data_port`, no control channel.
    pub fn listen(data_port: u16) -> Result<Self, Error> {
        Self::new(Config::listen(data_port))
    }

    // ===== Data channel =====

    /// Receive and decode one measurement datagram.
    ///
    /// On success the frame snapshot is replaced whole. On any failure
    /// the previous snapshot is retained and the data-channel status
    /// records the classification.
    pub fn receive(&mut self) -> Result<(), Error> {
        let len = match self.transport.recv(&mut self.buf) {
            Ok(len) => len,
            Err(err) => {
                self.data_status = match err {
                    TransportError::Timeout => ChannelStatus::Timeout,
                    _ => ChannelStatus::Transport,
                };
                return Err(err.into());
            }
        };
        // decode before touching any state so the buffer borrow ends here
        let decoded = match std::str::from_utf8(&self.buf[..len]) {
            Ok(payload) => decode_frame(payload),
            Err(_) => Err(crate::parser::ParseError::InvalidText),
        };
        self.apply_decoded(decoded)
    }

    /// Decode a payload obtained elsewhere (capture replay, tests).
    /// Classifies exactly like [`Self::receive`].
    pub fn process_packet(&mut self, payload: &str) -> Result<(), Error> {
        self.apply_decoded(decode_frame(payload))
    }

    fn apply_decoded(
        &mut self,
        decoded: std::result::Result<Frame, crate::parser::ParseError>,
    ) -> Result<(), Error> {
        match decoded {
            Ok(frame) => {
                self.frame = frame;
                self.data_status = ChannelStatus::None;
                Ok(())
            }
            Err(err) => {
                log::debug!("[CLIENT] frame parse failed err={}", err);
                self.data_status = ChannelStatus::Parse;
                Err(err.into())
            }
        }
    }

    /// Classification of the most recent data-channel operation.
    pub fn data_status(&self) -> ChannelStatus {
        self.data_status
    }

    /// The local port the data socket is bound to (useful with port 0).
    pub fn data_port(&self) -> Result<u16, Error> {
        Ok(self.transport.local_port()?)
    }

    /// Adjust the data channel receive timeout.
    pub fn set_data_timeout(&mut self, timeout: std::time::Duration) -> Result<(), Error> {
        if timeout.is_zero() {
            return Err(Error::InvalidArgument("data timeout must be non-zero"));
        }
        self.transport.set_timeout(timeout)?;
        Ok(())
    }

    /// Adjust the control channel command timeout.
    pub fn set_command_timeout(&mut self, timeout: std::time::Duration) -> Result<(), Error> {
        if timeout.is_zero() {
            return Err(Error::InvalidArgument("command timeout must be non-zero"));
        }
        self.with_control(|channel| channel.set_timeout(timeout))
    }

    /// Resize the data receive buffer.
    pub fn set_buffer_size(&mut self, size: usize) -> Result<(), Error> {
        if size < 2 {
            return Err(Error::InvalidArgument("buffer size too small"));
        }
        self.buf.resize(size, 0);
        Ok(())
    }

    // ===== Frame snapshot queries =====

    /// The current frame snapshot.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame.frame_counter
    }

    /// Device timestamp in seconds, or −1.0 when the dialect omits it.
    pub fn timestamp(&self) -> f64 {
        self.frame.timestamp
    }

    pub fn num_bodies(&self) -> usize {
        self.frame.num_bodies()
    }

    pub fn body(&self, id: usize) -> Body {
        self.frame.body(id)
    }

    pub fn num_flysticks(&self) -> usize {
        self.frame.num_flysticks()
    }

    pub fn flystick(&self, id: usize) -> Flystick {
        self.frame.flystick(id)
    }

    pub fn num_tools(&self) -> usize {
        self.frame.num_tools()
    }

    pub fn tool(&self, id: usize) -> MeasurementTool {
        self.frame.tool(id)
    }

    pub fn num_tool_refs(&self) -> usize {
        self.frame.num_tool_refs()
    }

    pub fn tool_ref(&self, id: usize) -> MeasurementRef {
        self.frame.tool_ref(id)
    }

    pub fn num_markers(&self) -> usize {
        self.frame.num_markers()
    }

    pub fn marker(&self, index: usize) -> Marker {
        self.frame.marker(index)
    }

    pub fn num_hands(&self) -> usize {
        self.frame.num_hands()
    }

    pub fn hand(&self, id: usize) -> Hand {
        self.frame.hand(id)
    }

    pub fn num_humans(&self) -> usize {
        self.frame.num_humans()
    }

    pub fn human(&self, id: usize) -> Human {
        self.frame.human(id)
    }

    pub fn num_inertial_bodies(&self) -> usize {
        self.frame.num_inertial_bodies()
    }

    pub fn inertial_body(&self, id: usize) -> InertialBody {
        self.frame.inertial_body(id)
    }

    pub fn system_status(&self) -> Option<&SystemStatus> {
        self.frame.system_status.as_ref()
    }

    // ===== Control channel =====

    /// Classification of the most recent control-channel operation.
    pub fn control_status(&self) -> ChannelStatus {
        self.control_status
    }

    /// Whether a control channel is connected.
    pub fn has_control_channel(&self) -> bool {
        self.control.is_some()
    }

    /// The last `err` reply from the device, if any.
    pub fn last_device_error(&self) -> Option<(i32, &str)> {
        self.control.as_ref().and_then(ControlChannel::last_device_error)
    }

    /// Submit a raw command line and return its resolved response.
    pub fn send_command(&mut self, command: &str) -> Result<CommandResponse, Error> {
        self.with_control(|channel| channel.send_command(command))
    }

    /// Query a device parameter value.
    pub fn get_param(&mut self, param: &str) -> Result<String, Error> {
        self.with_control(|channel| channel.get_param(param))
    }

    /// Set a device parameter.
    pub fn set_param(&mut self, param: &str, value: &str) -> Result<(), Error> {
        self.with_control(|channel| channel.set_param(param, value))
    }

    /// Start continuous measurement.
    pub fn start_measurement(&mut self) -> Result<(), Error> {
        self.with_control(ControlChannel::start_measurement)
    }

    /// Stop measurement.
    pub fn stop_measurement(&mut self) -> Result<(), Error> {
        self.with_control(ControlChannel::stop_measurement)
    }

    /// Ask the controller for its next stored event message. The message,
    /// if any, is returned and the queue left untouched.
    pub fn request_message(&mut self) -> Result<Option<EventMessage>, Error> {
        self.with_control(ControlChannel::request_message)
    }

    /// Drain one message from the local queue (messages captured while
    /// commands were in flight).
    pub fn poll_message(&mut self) -> Option<EventMessage> {
        self.control.as_mut().and_then(|c| c.messages().poll())
    }

    fn with_control<T>(
        &mut self,
        op: impl FnOnce(&mut ControlChannel) -> Result<T, ControlError>,
    ) -> Result<T, Error> {
        let channel = self.control.as_mut().ok_or(Error::NoControlChannel)?;
        match op(channel) {
            Ok(value) => {
                self.control_status = ChannelStatus::None;
                Ok(value)
            }
            Err(err) => {
                self.control_status = classify_control(&err);
                Err(err.into())
            }
        }
    }

    // ===== Feedback channel (UDP to the controller) =====

    /// Tactile feedback on one finger of a hand target. The strength
    /// must be within [0, 1].
    pub fn tactile_finger(
        &mut self,
        hand_id: usize,
        finger_id: usize,
        strength: f64,
    ) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&strength) {
            return Err(Error::InvalidArgument("feedback strength outside [0, 1]"));
        }
        self.send_feedback(&format!("tfb 1 {} {} {}", hand_id, finger_id, strength))
    }

    /// Tactile feedback on all fingers of a hand target, one entry per
    /// finger. Each strength must be within [0, 1].
    pub fn tactile_hand(&mut self, hand_id: usize, strengths: &[f64]) -> Result<(), Error> {
        if strengths.iter().any(|s| !(0.0..=1.0).contains(s)) {
            return Err(Error::InvalidArgument("feedback strength outside [0, 1]"));
        }
        let mut cmd = format!("tfb {}", strengths.len());
        for (finger_id, s) in strengths.iter().enumerate() {
            cmd.push_str(&format!(" {} {} {}", hand_id, finger_id, s));
        }
        self.send_feedback(&cmd)
    }

    /// Switch tactile feedback off for all fingers of a hand target.
    pub fn tactile_hand_off(&mut self, hand_id: usize, num_fingers: usize) -> Result<(), Error> {
        let strengths = vec![0.0; num_fingers];
        self.tactile_hand(hand_id, &strengths)
    }

    /// Beep a flystick for `duration_ms` at `frequency_hz`.
    pub fn flystick_beep(
        &mut self,
        flystick_id: usize,
        duration_ms: u32,
        frequency_hz: u32,
    ) -> Result<(), Error> {
        self.send_feedback(&format!(
            "ffb {} beep {} {}",
            flystick_id, duration_ms, frequency_hz
        ))
    }

    /// Trigger a device-defined vibration pattern on a flystick.
    pub fn flystick_vibration(&mut self, flystick_id: usize, pattern: u32) -> Result<(), Error> {
        self.send_feedback(&format!("ffb {} vibr {}", flystick_id, pattern))
    }

    fn send_feedback(&mut self, command: &str) -> Result<(), Error> {
        let host = self.remote_ip.ok_or(Error::NoControlChannel)?;
        self.transport.send_feedback(host, command.as_bytes())?;
        Ok(())
    }
}

/// Map a control-channel error to its status classification. Device
/// errors are replies, not channel failures.
fn classify_control(err: &ControlError) -> ChannelStatus {
    match err {
        ControlError::Timeout => ChannelStatus::Timeout,
        ControlError::Closed | ControlError::Io(_) => ChannelStatus::Transport,
        ControlError::Protocol(_) => ChannelStatus::Parse,
        ControlError::Device { .. } | ControlError::TooLong(_) => ChannelStatus::None,
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, Error> {
    (host, port)
        .to_socket_addrs()
        .map_err(|_| Error::BadAddress(host.to_owned()))?
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| Error::BadAddress(host.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listening_tracker_has_no_control_channel() {
        let mut tracker = Tracker::listen(0).unwrap();
        assert!(!tracker.has_control_channel());
        assert!(matches!(
            tracker.send_command("dtrack2 tracking start"),
            Err(Error::NoControlChannel)
        ));
        assert!(tracker.poll_message().is_none());
    }

    #[test]
    fn process_packet_replaces_snapshot_and_clears_status() {
        let mut tracker = Tracker::listen(0).unwrap();
        tracker
            .process_packet("7 1.25 bod 1 0 0.5 1 2 3 1 0 0 0 1 0 0 0 1")
            .unwrap();
        assert_eq!(tracker.frame_counter(), 7);
        assert_eq!(tracker.timestamp(), 1.25);
        assert_eq!(tracker.num_bodies(), 1);
        assert_eq!(tracker.data_status(), ChannelStatus::None);
    }

    #[test]
    fn parse_failure_keeps_previous_snapshot() {
        let mut tracker = Tracker::listen(0).unwrap();
        tracker
            .process_packet("7 1.25 bod 1 0 0.5 1 2 3 1 0 0 0 1 0 0 0 1")
            .unwrap();
        assert!(tracker.process_packet("8 2.0 bod 1 0 junk").is_err());
        assert_eq!(tracker.data_status(), ChannelStatus::Parse);
        // previous snapshot retained
        assert_eq!(tracker.frame_counter(), 7);
        assert!(tracker.body(0).pose.is_tracked());
    }

    #[test]
    fn out_of_range_strength_is_rejected_locally() {
        let mut tracker = Tracker::listen(0).unwrap();
        assert!(matches!(
            tracker.tactile_hand(0, &[0.5, 1.5]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            tracker.tactile_finger(0, 1, -0.1),
            Err(Error::InvalidArgument(_))
        ));
        // valid strength fails later, on the missing controller address
        assert!(matches!(
            tracker.tactile_finger(0, 1, 0.5),
            Err(Error::NoControlChannel)
        ));
    }

    #[test]
    fn receive_decodes_loopback_datagram() {
        let config = Config::listen(0).with_data_timeout(std::time::Duration::from_millis(500));
        let mut tracker = Tracker::new(config).unwrap();
        let port = tracker.data_port().unwrap();

        let sender = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        sender
            .send_to(
                b"21 0.5 bod 1 0 0.9 1 2 3 1 0 0 0 1 0 0 0 1",
                ("127.0.0.1", port),
            )
            .unwrap();

        tracker.receive().unwrap();
        assert_eq!(tracker.frame_counter(), 21);
        assert_eq!(tracker.num_bodies(), 1);
        assert!(tracker.body(0).pose.is_tracked());
        assert_eq!(tracker.data_status(), ChannelStatus::None);
    }

    #[test]
    fn receive_timeout_sets_data_status() {
        let config = Config::listen(0).with_data_timeout(std::time::Duration::from_millis(50));
        let mut tracker = Tracker::new(config).unwrap();
        assert!(tracker.receive().is_err());
        assert_eq!(tracker.data_status(), ChannelStatus::Timeout);
    }
}
