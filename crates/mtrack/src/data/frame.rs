// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame store: the most recently decoded snapshot of all tracked targets.

use super::types::{
    Body, Flystick, Hand, Human, InertialBody, Marker, MeasurementRef, MeasurementTool,
    SystemStatus,
};

/// One complete decoded snapshot of all tracked targets for a single time
/// sample.
///
/// A frame is built in full by the decoder and then swapped into the
/// tracker wholesale, so a failed decode never leaves a half-updated
/// snapshot and a frame that omits a record type never shows stale data
/// from a previous frame.
///
/// Indexed accessors never fail: an index at or beyond the current count
/// returns an untracked sentinel record carrying the requested id.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Frame counter as delivered by the device.
    pub frame_counter: u32,
    /// Timestamp in seconds; -1.0 when the active dialect does not supply one.
    pub timestamp: f64,
    /// Standard rigid bodies.
    pub bodies: Vec<Body>,
    /// Handheld wands.
    pub flysticks: Vec<Flystick>,
    /// Measurement tools.
    pub tools: Vec<MeasurementTool>,
    /// Measurement tool references.
    pub tool_refs: Vec<MeasurementRef>,
    /// Single markers.
    pub markers: Vec<Marker>,
    /// Articulated hands.
    pub hands: Vec<Hand>,
    /// Human skeletal models.
    pub humans: Vec<Human>,
    /// Hybrid optical-inertial bodies.
    pub inertial_bodies: Vec<InertialBody>,
    /// System status record, if the payload carried one.
    pub system_status: Option<SystemStatus>,
}

impl Frame {
    /// Empty frame with no targets and timestamp -1.
    pub fn new() -> Self {
        Self {
            timestamp: -1.0,
            ..Default::default()
        }
    }

    /// Number of standard bodies (as far as known, including calibrated
    /// but currently untracked ones).
    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Body by id; untracked sentinel if out of range.
    pub fn body(&self, id: usize) -> Body {
        self.bodies.get(id).cloned().unwrap_or_else(|| Body::untracked(id))
    }

    /// Number of Flysticks.
    pub fn num_flysticks(&self) -> usize {
        self.flysticks.len()
    }

    /// Flystick by id; untracked sentinel if out of range.
    pub fn flystick(&self, id: usize) -> Flystick {
        self.flysticks
            .get(id)
            .cloned()
            .unwrap_or_else(|| Flystick::untracked(id))
    }

    /// Number of measurement tools.
    pub fn num_tools(&self) -> usize {
        self.tools.len()
    }

    /// Measurement tool by id; untracked sentinel if out of range.
    pub fn tool(&self, id: usize) -> MeasurementTool {
        self.tools
            .get(id)
            .cloned()
            .unwrap_or_else(|| MeasurementTool::untracked(id))
    }

    /// Number of measurement tool references.
    pub fn num_tool_refs(&self) -> usize {
        self.tool_refs.len()
    }

    /// Measurement tool reference by id; untracked sentinel if out of range.
    pub fn tool_ref(&self, id: usize) -> MeasurementRef {
        self.tool_refs
            .get(id)
            .cloned()
            .unwrap_or_else(|| MeasurementRef::untracked(id))
    }

    /// Number of single markers in this frame.
    pub fn num_markers(&self) -> usize {
        self.markers.len()
    }

    /// Marker by index (not id); sentinel if out of range.
    pub fn marker(&self, index: usize) -> Marker {
        self.markers
            .get(index)
            .cloned()
            .unwrap_or_else(|| Marker::untracked(index))
    }

    /// Number of hands (as far as known).
    pub fn num_hands(&self) -> usize {
        self.hands.len()
    }

    /// Hand by id; untracked sentinel if out of range.
    pub fn hand(&self, id: usize) -> Hand {
        self.hands.get(id).cloned().unwrap_or_else(|| Hand::untracked(id))
    }

    /// Number of human models.
    pub fn num_humans(&self) -> usize {
        self.humans.len()
    }

    /// Human model by id; untracked sentinel if out of range.
    pub fn human(&self, id: usize) -> Human {
        self.humans
            .get(id)
            .cloned()
            .unwrap_or_else(|| Human::untracked(id))
    }

    /// Number of hybrid optical-inertial bodies.
    pub fn num_inertial_bodies(&self) -> usize {
        self.inertial_bodies.len()
    }

    /// Hybrid body by id; untracked sentinel if out of range.
    pub fn inertial_body(&self, id: usize) -> InertialBody {
        self.inertial_bodies
            .get(id)
            .cloned()
            .unwrap_or_else(|| InertialBody::untracked(id))
    }

    /// Grow the body collection with untracked sentinels up to `count`.
    ///
    /// Used for the calibrated-body count: bodies that are calibrated but
    /// not visible this frame still appear, as untracked records. Never
    /// shrinks; decoded data wins.
    pub(crate) fn pad_bodies(&mut self, count: usize) {
        let start = self.bodies.len();
        for id in start..count {
            self.bodies.push(Body::untracked(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::Pose;

    #[test]
    fn indexed_get_beyond_count_returns_sentinel() {
        let frame = Frame::new();
        assert_eq!(frame.num_bodies(), 0);
        let body = frame.body(3);
        assert_eq!(body.id, 3);
        assert!(!body.pose.is_tracked());
        assert_eq!(body.pose.quality(), -1.0);
        assert_eq!(frame.hand(9).id, 9);
        assert_eq!(frame.marker(1).quality, -1.0);
    }

    #[test]
    fn pad_bodies_never_shrinks() {
        let mut frame = Frame::new();
        frame.bodies.push(Body {
            id: 0,
            pose: Pose::Tracked {
                quality: 1.0,
                loc: [0.0; 3],
                rot: [0.0; 9],
            },
        });
        frame.pad_bodies(3);
        assert_eq!(frame.num_bodies(), 3);
        assert!(frame.body(0).pose.is_tracked());
        assert!(!frame.body(2).pose.is_tracked());

        frame.pad_bodies(1);
        assert_eq!(frame.num_bodies(), 3);
    }

    #[test]
    fn fresh_frame_has_no_timestamp() {
        let frame = Frame::new();
        assert_eq!(frame.timestamp, -1.0);
        assert_eq!(frame.frame_counter, 0);
        assert!(frame.system_status.is_none());
    }
}
