// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed per-target records decoded from one tracking frame.
//!
//! All 6DOF targets share the same shape: a stable `id`, a quality value in
//! `[0, 1]` where the sentinel -1 means "not currently tracked", a location
//! in millimeters and a row-major 3x3 rotation matrix. Internally the
//! tracked/untracked distinction is a tagged [`Pose`] variant so stale
//! geometry cannot be read by accident; the raw sentinel is still available
//! through [`Pose::quality`] for callers that want it.

/// 6DOF pose of a target, tagged by tracking state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Pose {
    /// Target is tracked; geometry is valid.
    Tracked {
        /// Quality in `[0, 1]`.
        quality: f64,
        /// Location in millimeters.
        loc: [f64; 3],
        /// Rotation matrix (row-major 3x3).
        rot: [f64; 9],
    },
    /// Target is not tracked this frame; geometry reads as zero.
    #[default]
    NotTracked,
}

impl Pose {
    /// Whether the target is tracked this frame.
    pub fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked { .. })
    }

    /// Raw quality value; -1.0 when not tracked.
    pub fn quality(&self) -> f64 {
        match self {
            Self::Tracked { quality, .. } => *quality,
            Self::NotTracked => -1.0,
        }
    }

    /// Location in millimeters; zero when not tracked.
    pub fn loc(&self) -> [f64; 3] {
        match self {
            Self::Tracked { loc, .. } => *loc,
            Self::NotTracked => [0.0; 3],
        }
    }

    /// Rotation matrix (row-major 3x3); zero when not tracked.
    pub fn rot(&self) -> [f64; 9] {
        match self {
            Self::Tracked { rot, .. } => *rot,
            Self::NotTracked => [0.0; 9],
        }
    }
}

/// Standard rigid body (6DOF).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// Id number (starting with 0), stable across frames while tracked.
    pub id: usize,
    /// Pose, tagged by tracking state.
    pub pose: Pose,
}

impl Body {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            pose: Pose::NotTracked,
        }
    }
}

/// Handedness of a tracked hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    /// Left hand.
    #[default]
    Left,
    /// Right hand.
    Right,
}

/// Handheld wand (6DOF plus buttons and joystick axes).
///
/// `buttons` and `joysticks` hold exactly the number of valid entries the
/// device reported (at most [`MAX_BUTTONS`](crate::config::MAX_BUTTONS) and
/// [`MAX_JOYSTICK`](crate::config::MAX_JOYSTICK)).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flystick {
    /// Id number (starting with 0).
    pub id: usize,
    /// Pose, tagged by tracking state.
    pub pose: Pose,
    /// Button states, pressed = `true`.
    pub buttons: Vec<bool>,
    /// Joystick axes in `[-1, 1]`.
    pub joysticks: Vec<f64>,
}

impl Flystick {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// Measurement tool (6DOF plus buttons and tip radius).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementTool {
    /// Id number (starting with 0).
    pub id: usize,
    /// Pose, tagged by tracking state.
    pub pose: Pose,
    /// Radius of the tip in millimeters, if applicable.
    pub tip_radius: f64,
    /// Button states, pressed = `true`.
    pub buttons: Vec<bool>,
}

impl MeasurementTool {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// Measurement tool reference (6DOF).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeasurementRef {
    /// Id number (starting with 0).
    pub id: usize,
    /// Pose, tagged by tracking state.
    pub pose: Pose,
}

impl MeasurementRef {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            pose: Pose::NotTracked,
        }
    }
}

/// Single marker (3DOF).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marker {
    /// Id number as delivered by the device (markers start with 1).
    pub id: usize,
    /// Quality in `[0, 1]`; -1.0 in sentinel records.
    pub quality: f64,
    /// Location in millimeters.
    pub loc: [f64; 3],
}

impl Marker {
    /// Sentinel record with the given id and quality -1.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            quality: -1.0,
            loc: [0.0; 3],
        }
    }
}

/// Finger of a tracked hand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Finger {
    /// Location of the fingertip in millimeters.
    pub loc: [f64; 3],
    /// Rotation matrix of the outermost phalanx (row-major 3x3).
    pub rot: [f64; 9],
    /// Radius of the fingertip in millimeters.
    pub tip_radius: f64,
    /// Phalanx lengths in millimeters (outermost, middle, innermost).
    pub phalanx_lengths: [f64; 3],
    /// Angles between phalanxes in degrees (outermost, innermost).
    pub phalanx_angles: [f64; 2],
}

/// Articulated hand (6DOF back of hand plus per-finger joints).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hand {
    /// Id number (starting with 0).
    pub id: usize,
    /// Pose of the back of the hand.
    pub pose: Pose,
    /// Left or right hand.
    pub handedness: Handedness,
    /// Finger data (order: thumb, index finger, middle finger, ...), at
    /// most [`MAX_FINGERS`](crate::config::MAX_FINGERS) entries.
    pub fingers: Vec<Finger>,
}

impl Hand {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// One joint of a human skeletal model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Joint {
    /// Stable joint id within the model.
    pub id: usize,
    /// Pose, tagged by tracking state.
    pub pose: Pose,
}

/// Human skeletal model: an ordered sequence of joints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Human {
    /// Id number of the model (starting with 0).
    pub id: usize,
    /// Joints of the model; empty when the model is not tracked.
    pub joints: Vec<Joint>,
}

impl Human {
    /// Untracked sentinel record with the given id and no joints.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            joints: Vec::new(),
        }
    }

    /// Whether the model is currently tracked.
    pub fn is_tracked(&self) -> bool {
        !self.joints.is_empty()
    }
}

/// Hybrid optical-inertial body (6DOF).
///
/// Tracked whenever `state > 0`: 1 = inertial only, 2 = optical only,
/// 3 = inertial and optical.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InertialBody {
    /// Id number (starting with 0).
    pub id: usize,
    /// Tracking state code; 0 means not tracked.
    pub state: i32,
    /// Drift error estimate in degrees (inertial tracking only).
    pub drift_error: f64,
    /// Location in millimeters.
    pub loc: [f64; 3],
    /// Rotation matrix (row-major 3x3).
    pub rot: [f64; 9],
}

impl InertialBody {
    /// Untracked sentinel record with the given id.
    pub fn untracked(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Whether the body is currently tracked.
    pub fn is_tracked(&self) -> bool {
        self.state > 0
    }
}

/// Per-camera reflection statistics from the system status record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraStatus {
    /// Camera id.
    pub id: usize,
    /// Number of reflections seen by this camera.
    pub reflections: u32,
    /// Number of reflections used for tracking.
    pub reflections_used: u32,
}

/// System status record: tracking and message counters plus per-camera
/// statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SystemStatus {
    /// Number of cameras in the system.
    pub num_cameras: u32,
    /// Number of currently tracked 6DOF bodies.
    pub num_tracked_bodies: u32,
    /// Number of currently tracked single markers.
    pub num_tracked_markers: u32,
    /// Count of pending error messages on the controller.
    pub msg_errors: u32,
    /// Count of pending warning messages on the controller.
    pub msg_warnings: u32,
    /// Count of pending info messages on the controller.
    pub msg_infos: u32,
    /// Per-camera reflection statistics.
    pub cameras: Vec<CameraStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_sentinel_geometry_is_zero() {
        let p = Pose::NotTracked;
        assert!(!p.is_tracked());
        assert_eq!(p.quality(), -1.0);
        assert_eq!(p.loc(), [0.0; 3]);
        assert_eq!(p.rot(), [0.0; 9]);
    }

    #[test]
    fn tracked_pose_exposes_raw_quality() {
        let p = Pose::Tracked {
            quality: 0.75,
            loc: [1.0, 2.0, 3.0],
            rot: [0.0; 9],
        };
        assert!(p.is_tracked());
        assert_eq!(p.quality(), 0.75);
        assert_eq!(p.loc(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn untracked_records_preserve_id() {
        assert_eq!(Body::untracked(7).id, 7);
        assert_eq!(Flystick::untracked(2).buttons.len(), 0);
        assert!(!Human::untracked(1).is_tracked());
        assert!(!InertialBody::untracked(0).is_tracked());
    }
}
