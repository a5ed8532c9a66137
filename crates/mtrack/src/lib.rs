// SPDX-License-Identifier: Apache-2.0 OR MIT

//! mtrack — client-side protocol engine for motion-capture tracking
//! controllers.
//!
//! The controller streams per-frame tracking data as ASCII datagrams over
//! UDP and accepts commands over a persistent TCP connection. This crate
//! decodes the data stream into typed records (rigid bodies, Flysticks,
//! measurement tools, hands, human models, inertial bodies, single
//! markers, system status), correlates control-channel commands with
//! their replies while capturing interleaved event messages, and
//! classifies failures per channel.
//!
//! ```no_run
//! use mtrack::{Config, Tracker};
//!
//! let mut tracker = Tracker::new(Config::with_server("192.168.0.1", 5000))?;
//! tracker.start_measurement()?;
//! for _ in 0..100 {
//!     if tracker.receive().is_ok() {
//!         println!("frame {}: {} bodies", tracker.frame_counter(), tracker.num_bodies());
//!     }
//! }
//! tracker.stop_measurement()?;
//! # Ok::<(), mtrack::Error>(())
//! ```

pub mod config;
pub mod control;
pub mod data;
pub mod error;
pub mod parser;
pub mod transport;

mod client;

pub use client::Tracker;
pub use config::Config;
pub use control::{CommandResponse, EventMessage};
pub use data::{
    Body, CameraStatus, Finger, Flystick, Frame, Hand, Handedness, Human, InertialBody, Joint,
    Marker, MeasurementRef, MeasurementTool, Pose, SystemStatus,
};
pub use error::{ChannelStatus, Error};

/// Convenience alias for tracker operations.
pub type Result<T> = std::result::Result<T, Error>;
