// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Protocol constants and tracker configuration.
//!
//! This module centralizes all wire-protocol constants and runtime
//! configuration. Port numbers and timeouts are defined here once and used
//! everywhere else by name.

use std::net::Ipv4Addr;
use std::time::Duration;

// =======================================================================
// Controller ports
// =======================================================================

/// Controller port number (TCP) for the command interface.
pub const COMMAND_PORT: u16 = 50105;

/// Controller port number (UDP) for feedback commands (tactile, beep).
pub const FEEDBACK_PORT: u16 = 50110;

// =======================================================================
// Timeouts and buffers
// =======================================================================

/// Default receive timeout on the tracking data channel.
pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(1);

/// Default timeout for a command round-trip on the control channel.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// Default receive buffer size for tracking data datagrams (in bytes).
pub const DEFAULT_BUFFER_SIZE: usize = 32768;

/// Maximum length of one command line on the control channel (in bytes).
pub const MAX_COMMAND_LEN: usize = 200;

// =======================================================================
// Record capacities (wire-format contract, not storage limits)
// =======================================================================

/// Maximum number of buttons per Flystick or measurement tool.
pub const MAX_BUTTONS: usize = 16;

/// Maximum number of joystick axes per Flystick.
pub const MAX_JOYSTICK: usize = 8;

/// Maximum number of fingers per tracked hand.
pub const MAX_FINGERS: usize = 5;

/// Maximum number of joints per human model.
pub const MAX_JOINTS: usize = 200;

/// Configuration for a [`Tracker`](crate::Tracker).
///
/// All transport parameters are supplied at construction. The receive
/// buffer size and both timeouts may additionally be adjusted on a live
/// tracker; everything else is fixed for the tracker's lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controller hostname or IP address. `None` selects pure listening
    /// mode: tracking data only, no control channel.
    pub server_host: Option<String>,

    /// Controller command port (TCP).
    pub command_port: u16,

    /// Local UDP port for tracking data (0 = OS-assigned).
    pub data_port: u16,

    /// Multicast group to join for tracking data, if the controller
    /// sends to a multicast address.
    pub multicast_group: Option<Ipv4Addr>,

    /// Receive timeout on the data channel.
    pub data_timeout: Duration,

    /// Command round-trip timeout on the control channel.
    pub command_timeout: Duration,

    /// Receive buffer size for tracking data datagrams.
    pub buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: None,
            command_port: COMMAND_PORT,
            data_port: 0,
            multicast_group: None,
            data_timeout: DEFAULT_DATA_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Create a listening-mode configuration for the given data port.
    pub fn listen(data_port: u16) -> Self {
        Self {
            data_port,
            ..Default::default()
        }
    }

    /// Create a configuration with a controller host for the control channel.
    pub fn with_server(host: impl Into<String>, data_port: u16) -> Self {
        Self {
            server_host: Some(host.into()),
            data_port,
            ..Default::default()
        }
    }

    /// Builder: set the controller command port.
    pub fn with_command_port(mut self, port: u16) -> Self {
        self.command_port = port;
        self
    }

    /// Builder: join a multicast group for tracking data.
    pub fn with_multicast_group(mut self, group: Ipv4Addr) -> Self {
        self.multicast_group = Some(group);
        self
    }

    /// Builder: set the data channel receive timeout.
    pub fn with_data_timeout(mut self, timeout: Duration) -> Self {
        self.data_timeout = timeout;
        self
    }

    /// Builder: set the control channel command timeout.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Builder: set the data receive buffer size.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.data_timeout.is_zero() {
            return Err("data_timeout must be non-zero");
        }
        if self.command_timeout.is_zero() {
            return Err("command_timeout must be non-zero");
        }
        if self.buffer_size < 2 {
            return Err("buffer_size too small");
        }
        if let Some(host) = &self.server_host {
            if host.is_empty() {
                return Err("server_host must not be empty");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::default().buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn builders_chain() {
        let cfg = Config::with_server("10.0.0.7", 5000)
            .with_command_timeout(Duration::from_secs(2))
            .with_buffer_size(4096);
        assert_eq!(cfg.server_host.as_deref(), Some("10.0.0.7"));
        assert_eq!(cfg.data_port, 5000);
        assert_eq!(cfg.command_port, COMMAND_PORT);
        assert_eq!(cfg.buffer_size, 4096);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = Config::listen(5000).with_data_timeout(Duration::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_host() {
        let cfg = Config {
            server_host: Some(String::new()),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
