// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Record model and frame store.

mod frame;
mod types;

pub use frame::Frame;
pub use types::{
    Body, CameraStatus, Finger, Flystick, Hand, Handedness, Human, InertialBody, Joint, Marker,
    MeasurementRef, MeasurementTool, Pose, SystemStatus,
};
