// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame decoder: keyword-tagged groups of record tuples.
//!
//! A payload starts with a frame counter and an optional timestamp,
//! followed by groups of the form `<keyword> <count> <tuple>{count}`.
//! Unknown keywords are skipped up to the next recognized keyword, so
//! payloads from newer device firmware degrade to their recognized subset
//! instead of failing.
//!
//! Untracked records come in two dialects: one carries explicit
//! zero-filled geometry, the other omits the geometry tokens entirely.
//! A flat token stream cannot distinguish the two per record, so the
//! dialect is latched per group: each group is first decoded assuming
//! explicit geometry, and re-decoded with omitted geometry when that
//! attempt fails or stops short of the group boundary.

use super::scan::{is_numeric, Scanner};
use super::ParseError;
use crate::config::{MAX_BUTTONS, MAX_FINGERS, MAX_JOINTS, MAX_JOYSTICK};
use crate::data::{
    Body, CameraStatus, Finger, Flystick, Frame, Hand, Handedness, Human, InertialBody, Joint,
    Marker, MeasurementRef, MeasurementTool, Pose, SystemStatus,
};

/// Group keywords this decoder recognizes. Tokens outside a recognized
/// group are skipped until one of these (or end of payload) is seen.
const KEYWORDS: &[&str] = &[
    "bod", "fly", "mtl", "mrf", "mrk", "hnd", "hum", "ibd", "sst", "cal",
];

fn is_keyword(tok: &str) -> bool {
    KEYWORDS.contains(&tok)
}

/// How untracked records represent their geometry within one group.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Geometry {
    /// Geometry tokens are always present; untracked records carry
    /// zero-filled (ignored) values.
    Explicit,
    /// Untracked records omit their geometry tokens entirely.
    Omitted,
}

/// Decode the full text of one payload into a fresh [`Frame`].
///
/// On error the caller's current frame is untouched; this function never
/// mutates shared state.
pub fn decode_frame(payload: &str) -> Result<Frame, ParseError> {
    let mut scan = Scanner::new(payload);
    let mut frame = Frame::new();

    frame.frame_counter = scan.next_u32("frame counter")?;
    // The older dialect omits the timestamp; detect by lookahead.
    if scan.peek_is_numeric() {
        frame.timestamp = scan.next_f64("timestamp")?;
    }

    let mut body_cal = None;
    while let Some(keyword) = scan.next_token() {
        match keyword {
            "bod" => decode_latched(&mut scan, &mut frame, decode_bodies)?,
            "fly" => decode_latched(&mut scan, &mut frame, decode_flysticks)?,
            "mtl" => decode_latched(&mut scan, &mut frame, decode_tools)?,
            "mrf" => decode_latched(&mut scan, &mut frame, decode_tool_refs)?,
            "mrk" => decode_markers(&mut scan, &mut frame)?,
            "hnd" => decode_latched(&mut scan, &mut frame, decode_hands)?,
            "hum" => decode_latched(&mut scan, &mut frame, decode_humans)?,
            "ibd" => decode_latched(&mut scan, &mut frame, decode_inertial)?,
            "sst" => decode_system_status(&mut scan, &mut frame)?,
            "cal" => body_cal = Some(scan.next_usize("calibrated body count")?),
            _ => {
                log::debug!("[PARSE] skipping unknown group keyword={}", keyword);
                skip_unknown(&mut scan);
            }
        }
    }

    // Calibrated bodies that are not visible this frame still appear,
    // as untracked records.
    if let Some(count) = body_cal {
        frame.pad_bodies(count);
    }

    Ok(frame)
}

/// Decode one group, latching its geometry dialect.
///
/// The explicit-geometry reading wins whenever it consumes the group
/// cleanly up to the next keyword (or end of payload); otherwise the
/// group is decoded again from its start with omitted geometry.
fn decode_latched(
    scan: &mut Scanner<'_>,
    frame: &mut Frame,
    decode: fn(&mut Scanner<'_>, &mut Frame, Geometry) -> Result<(), ParseError>,
) -> Result<(), ParseError> {
    let mut trial_scan = scan.clone();
    let mut trial_frame = frame.clone();
    if decode(&mut trial_scan, &mut trial_frame, Geometry::Explicit).is_ok()
        && at_group_boundary(&mut trial_scan)
    {
        *scan = trial_scan;
        *frame = trial_frame;
        return Ok(());
    }
    decode(scan, frame, Geometry::Omitted)
}

/// A group ends at a non-numeric token (keyword, known or not) or at the
/// end of the payload.
fn at_group_boundary(scan: &mut Scanner<'_>) -> bool {
    match scan.peek() {
        None => true,
        Some(tok) => !is_numeric(tok),
    }
}

/// Consume tokens until the next recognized keyword or end of payload.
fn skip_unknown(scan: &mut Scanner<'_>) {
    while let Some(tok) = scan.peek() {
        if is_keyword(tok) {
            return;
        }
        scan.next_token();
    }
}

/// Read quality-gated geometry. With [`Geometry::Explicit`] the tokens
/// are always consumed; a negative quality still maps to
/// [`Pose::NotTracked`] so the record reads as zero geometry.
fn read_pose(scan: &mut Scanner<'_>, quality: f64, geom: Geometry) -> Result<Pose, ParseError> {
    if quality < 0.0 && geom == Geometry::Omitted {
        return Ok(Pose::NotTracked);
    }
    let mut loc = [0.0; 3];
    let mut rot = [0.0; 9];
    scan.fill_f64(&mut loc, "location")?;
    scan.fill_f64(&mut rot, "rotation")?;
    if quality < 0.0 {
        return Ok(Pose::NotTracked);
    }
    Ok(Pose::Tracked { quality, loc, rot })
}

/// Read up to `count` button states; a short tail (the next token is a
/// keyword) leaves the remainder released (0).
fn read_buttons(scan: &mut Scanner<'_>, count: usize) -> Result<Vec<bool>, ParseError> {
    let mut buttons = Vec::with_capacity(count);
    while buttons.len() < count && scan.peek_is_numeric() {
        buttons.push(scan.next_i32("button state")? != 0);
    }
    buttons.resize(count, false);
    Ok(buttons)
}

fn decode_bodies(scan: &mut Scanner<'_>, frame: &mut Frame, geom: Geometry) -> Result<(), ParseError> {
    let count = scan.next_usize("body count")?;
    for _ in 0..count {
        let id = scan.next_usize("body id")?;
        let quality = scan.next_f64("body quality")?;
        let pose = read_pose(scan, quality, geom)?;
        grow_to(&mut frame.bodies, id, Body::untracked);
        frame.bodies[id] = Body { id, pose };
    }
    Ok(())
}

fn decode_flysticks(
    scan: &mut Scanner<'_>,
    frame: &mut Frame,
    geom: Geometry,
) -> Result<(), ParseError> {
    let count = scan.next_usize("flystick count")?;
    frame.flysticks.clear();
    for i in 0..count {
        let id = scan.next_usize("flystick id")?;
        if id != i {
            return Err(ParseError::IdMismatch {
                what: "flystick",
                expected: i,
                found: id,
            });
        }
        let quality = scan.next_f64("flystick quality")?;
        if quality < 0.0 && geom == Geometry::Omitted {
            frame.flysticks.push(Flystick::untracked(id));
            continue;
        }
        let num_buttons = scan.next_usize("flystick button count")?;
        if num_buttons > MAX_BUTTONS {
            return Err(ParseError::CountOutOfRange {
                what: "flystick buttons",
                count: num_buttons,
                max: MAX_BUTTONS,
            });
        }
        let num_joysticks = scan.next_usize("flystick joystick count")?;
        if num_joysticks > MAX_JOYSTICK {
            return Err(ParseError::CountOutOfRange {
                what: "flystick joysticks",
                count: num_joysticks,
                max: MAX_JOYSTICK,
            });
        }
        let pose = read_pose(scan, quality, geom)?;
        // button/joystick states stay valid while the pose is lost
        let buttons = read_buttons(scan, num_buttons)?;
        let mut joysticks = Vec::with_capacity(num_joysticks);
        while joysticks.len() < num_joysticks && scan.peek_is_numeric() {
            joysticks.push(scan.next_f64("joystick value")?);
        }
        joysticks.resize(num_joysticks, 0.0);
        frame.flysticks.push(Flystick {
            id,
            pose,
            buttons,
            joysticks,
        });
    }
    Ok(())
}

fn decode_tools(scan: &mut Scanner<'_>, frame: &mut Frame, geom: Geometry) -> Result<(), ParseError> {
    let count = scan.next_usize("tool count")?;
    frame.tools.clear();
    for i in 0..count {
        let id = scan.next_usize("tool id")?;
        if id != i {
            return Err(ParseError::IdMismatch {
                what: "tool",
                expected: i,
                found: id,
            });
        }
        let quality = scan.next_f64("tool quality")?;
        if quality < 0.0 && geom == Geometry::Omitted {
            frame.tools.push(MeasurementTool::untracked(id));
            continue;
        }
        let tip_radius = scan.next_f64("tool tip radius")?;
        let num_buttons = scan.next_usize("tool button count")?;
        if num_buttons > MAX_BUTTONS {
            return Err(ParseError::CountOutOfRange {
                what: "tool buttons",
                count: num_buttons,
                max: MAX_BUTTONS,
            });
        }
        let pose = read_pose(scan, quality, geom)?;
        let buttons = read_buttons(scan, num_buttons)?;
        frame.tools.push(MeasurementTool {
            id,
            pose,
            tip_radius,
            buttons,
        });
    }
    Ok(())
}

fn decode_tool_refs(
    scan: &mut Scanner<'_>,
    frame: &mut Frame,
    geom: Geometry,
) -> Result<(), ParseError> {
    let count = scan.next_usize("tool reference count")?;
    for _ in 0..count {
        let id = scan.next_usize("tool reference id")?;
        let quality = scan.next_f64("tool reference quality")?;
        let pose = read_pose(scan, quality, geom)?;
        grow_to(&mut frame.tool_refs, id, MeasurementRef::untracked);
        frame.tool_refs[id] = MeasurementRef { id, pose };
    }
    Ok(())
}

fn decode_markers(scan: &mut Scanner<'_>, frame: &mut Frame) -> Result<(), ParseError> {
    let count = scan.next_usize("marker count")?;
    frame.markers.clear();
    for _ in 0..count {
        let id = scan.next_usize("marker id")?;
        let quality = scan.next_f64("marker quality")?;
        let mut loc = [0.0; 3];
        scan.fill_f64(&mut loc, "marker location")?;
        frame.markers.push(Marker { id, quality, loc });
    }
    Ok(())
}

fn decode_hands(scan: &mut Scanner<'_>, frame: &mut Frame, geom: Geometry) -> Result<(), ParseError> {
    let count = scan.next_usize("hand count")?;
    for _ in 0..count {
        let id = scan.next_usize("hand id")?;
        let quality = scan.next_f64("hand quality")?;
        let lr = scan.next_i32("handedness")?;
        let handedness = if lr == 0 {
            Handedness::Left
        } else {
            Handedness::Right
        };
        let num_fingers = scan.next_usize("finger count")?;
        if num_fingers > MAX_FINGERS {
            return Err(ParseError::CountOutOfRange {
                what: "hand fingers",
                count: num_fingers,
                max: MAX_FINGERS,
            });
        }
        grow_to(&mut frame.hands, id, Hand::untracked);
        if quality < 0.0 && geom == Geometry::Omitted {
            frame.hands[id] = Hand {
                id,
                handedness,
                ..Hand::untracked(id)
            };
            continue;
        }
        let pose = read_pose(scan, quality, geom)?;
        let mut fingers = Vec::with_capacity(num_fingers);
        for _ in 0..num_fingers {
            fingers.push(read_finger(scan)?);
        }
        frame.hands[id] = Hand {
            id,
            pose,
            handedness,
            fingers,
        };
    }
    Ok(())
}

fn read_finger(scan: &mut Scanner<'_>) -> Result<Finger, ParseError> {
    let mut finger = Finger::default();
    scan.fill_f64(&mut finger.loc, "finger location")?;
    scan.fill_f64(&mut finger.rot, "finger rotation")?;
    finger.tip_radius = scan.next_f64("finger tip radius")?;
    // wire order: radius, then alternating length/angle outermost first
    finger.phalanx_lengths[0] = scan.next_f64("phalanx length")?;
    finger.phalanx_angles[0] = scan.next_f64("phalanx angle")?;
    finger.phalanx_lengths[1] = scan.next_f64("phalanx length")?;
    finger.phalanx_angles[1] = scan.next_f64("phalanx angle")?;
    finger.phalanx_lengths[2] = scan.next_f64("phalanx length")?;
    Ok(finger)
}

fn decode_humans(scan: &mut Scanner<'_>, frame: &mut Frame, geom: Geometry) -> Result<(), ParseError> {
    let count = scan.next_usize("human count")?;
    for _ in 0..count {
        let id = scan.next_usize("human id")?;
        let num_joints = scan.next_usize("joint count")?;
        if num_joints > MAX_JOINTS {
            return Err(ParseError::CountOutOfRange {
                what: "human joints",
                count: num_joints,
                max: MAX_JOINTS,
            });
        }
        let mut joints = Vec::with_capacity(num_joints);
        for _ in 0..num_joints {
            let joint_id = scan.next_usize("joint id")?;
            let quality = scan.next_f64("joint quality")?;
            let pose = read_pose(scan, quality, geom)?;
            joints.push(Joint { id: joint_id, pose });
        }
        grow_to(&mut frame.humans, id, Human::untracked);
        frame.humans[id] = Human { id, joints };
    }
    Ok(())
}

fn decode_inertial(
    scan: &mut Scanner<'_>,
    frame: &mut Frame,
    geom: Geometry,
) -> Result<(), ParseError> {
    let count = scan.next_usize("inertial body count")?;
    for _ in 0..count {
        let id = scan.next_usize("inertial body id")?;
        let state = scan.next_i32("tracking state")?;
        let drift_error = scan.next_f64("drift error")?;
        let mut loc = [0.0; 3];
        let mut rot = [0.0; 9];
        if state > 0 || geom == Geometry::Explicit {
            scan.fill_f64(&mut loc, "inertial location")?;
            scan.fill_f64(&mut rot, "inertial rotation")?;
        }
        if state <= 0 {
            loc = [0.0; 3];
            rot = [0.0; 9];
        }
        grow_to(&mut frame.inertial_bodies, id, InertialBody::untracked);
        frame.inertial_bodies[id] = InertialBody {
            id,
            state,
            drift_error,
            loc,
            rot,
        };
    }
    Ok(())
}

fn decode_system_status(scan: &mut Scanner<'_>, frame: &mut Frame) -> Result<(), ParseError> {
    let mut status = SystemStatus {
        num_cameras: scan.next_u32("camera count")?,
        num_tracked_bodies: scan.next_u32("tracked body count")?,
        num_tracked_markers: scan.next_u32("tracked marker count")?,
        msg_errors: scan.next_u32("error message count")?,
        msg_warnings: scan.next_u32("warning message count")?,
        msg_infos: scan.next_u32("info message count")?,
        cameras: Vec::new(),
    };
    let entries = scan.next_usize("camera entry count")?;
    for _ in 0..entries {
        status.cameras.push(CameraStatus {
            id: scan.next_usize("camera id")?,
            reflections: scan.next_u32("reflection count")?,
            reflections_used: scan.next_u32("used reflection count")?,
        });
    }
    frame.system_status = Some(status);
    Ok(())
}

/// Grow a collection with untracked sentinels so `index` is in range.
fn grow_to<T>(vec: &mut Vec<T>, index: usize, untracked: impl Fn(usize) -> T) {
    for id in vec.len()..=index {
        vec.push(untracked(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_two_bodies_one_untracked() {
        // frame 1, timestamp 2.5, two bodies: id 0 tracked with identity
        // rotation, id 1 untracked with explicit zero geometry
        let payload = "1 2.5 bod 2 \
                       0 0.9 1 2 3 1 0 0 0 1 0 0 0 1 \
                       1 -1 0 0 0 0 0 0 0 0 0 0 0 0";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.frame_counter, 1);
        assert_eq!(frame.timestamp, 2.5);
        assert_eq!(frame.num_bodies(), 2);

        let b0 = frame.body(0);
        assert!(b0.pose.is_tracked());
        assert_eq!(b0.pose.quality(), 0.9);
        assert_eq!(b0.pose.loc(), [1.0, 2.0, 3.0]);
        assert_eq!(
            b0.pose.rot(),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );

        let b1 = frame.body(1);
        assert!(!b1.pose.is_tracked());
        assert_eq!(b1.pose.quality(), -1.0);
        assert_eq!(b1.pose.loc(), [0.0; 3]);
    }

    #[test]
    fn missing_timestamp_defaults_to_minus_one() {
        let frame = decode_frame("42 bod 0").unwrap();
        assert_eq!(frame.frame_counter, 42);
        assert_eq!(frame.timestamp, -1.0);
    }

    #[test]
    fn untracked_body_with_absent_geometry() {
        let payload = "7 bod 1 0 -1 mrk 1 1 0.5 10 20 30";
        let frame = decode_frame(payload).unwrap();
        assert!(!frame.body(0).pose.is_tracked());
        assert_eq!(frame.num_markers(), 1);
        assert_eq!(frame.marker(0).loc, [10.0, 20.0, 30.0]);
    }

    #[test]
    fn untracked_body_mid_group_with_absent_geometry() {
        // body 0 untracked with no geometry tokens, body 1 tracked right
        // behind it in the same group
        let payload = "1 2.5 bod 2 0 -1 1 0.9 1 2 3 1 0 0 0 1 0 0 0 1";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_bodies(), 2);
        assert!(!frame.body(0).pose.is_tracked());
        let b1 = frame.body(1);
        assert!(b1.pose.is_tracked());
        assert_eq!(b1.pose.quality(), 0.9);
        assert_eq!(b1.pose.loc(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn untracked_flystick_mid_group_with_absent_geometry() {
        let payload = "4 0.5 fly 2 \
                       0 -1 \
                       1 0.7 1 0 10 20 30 1 0 0 0 1 0 0 0 1 1";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_flysticks(), 2);
        assert!(!frame.flystick(0).pose.is_tracked());
        let f1 = frame.flystick(1);
        assert!(f1.pose.is_tracked());
        assert_eq!(f1.buttons, vec![true]);
    }

    #[test]
    fn unknown_keyword_group_is_skipped() {
        let payload = "3 1.0 bod 1 0 0.5 1 2 3 1 0 0 0 1 0 0 0 1 \
                       zzz 4 9 9 9 9 mrk 1 1 1.0 5 6 7";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_bodies(), 1);
        assert_eq!(frame.num_markers(), 1);
        assert_eq!(frame.marker(0).id, 1);
    }

    #[test]
    fn malformed_required_field_is_a_hard_error() {
        let payload = "3 1.0 bod 1 0 abc 1 2 3 1 0 0 0 1 0 0 0 1";
        assert!(matches!(
            decode_frame(payload),
            Err(ParseError::InvalidNumber(_))
        ));
        assert!(decode_frame("").is_err());
    }

    #[test]
    fn flystick_buttons_and_joysticks() {
        let payload = "9 0.1 fly 1 0 0.8 4 2 \
                       100 200 300 1 0 0 0 1 0 0 0 1 \
                       1 0 1 0 -0.5 0.25";
        let frame = decode_frame(payload).unwrap();
        let fly = frame.flystick(0);
        assert!(fly.pose.is_tracked());
        assert_eq!(fly.buttons, vec![true, false, true, false]);
        assert_eq!(fly.joysticks, vec![-0.5, 0.25]);
    }

    #[test]
    fn flystick_short_button_tail_defaults_to_released() {
        // 4 buttons declared, only 2 present before the next group
        let payload = "9 0.1 fly 1 0 0.8 4 0 \
                       100 200 300 1 0 0 0 1 0 0 0 1 \
                       1 1 mrk 0";
        let frame = decode_frame(payload).unwrap();
        let fly = frame.flystick(0);
        assert_eq!(fly.buttons.len(), 4);
        assert_eq!(fly.buttons, vec![true, true, false, false]);
    }

    #[test]
    fn flystick_button_count_over_capacity_fails() {
        let payload = "9 0.1 fly 1 0 0.8 17 0 1 2 3 1 0 0 0 1 0 0 0 1";
        assert!(matches!(
            decode_frame(payload),
            Err(ParseError::CountOutOfRange { .. })
        ));
    }

    #[test]
    fn flystick_id_out_of_order_fails() {
        let payload = "9 0.1 fly 1 3 0.8 0 0 1 2 3 1 0 0 0 1 0 0 0 1";
        assert!(matches!(
            decode_frame(payload),
            Err(ParseError::IdMismatch { .. })
        ));
    }

    #[test]
    fn tool_with_tip_radius_and_buttons() {
        let payload = "5 mtl 1 0 0.7 12.5 2 \
                       1 2 3 1 0 0 0 1 0 0 0 1 1 0";
        let frame = decode_frame(payload).unwrap();
        let tool = frame.tool(0);
        assert_eq!(tool.tip_radius, 12.5);
        assert_eq!(tool.buttons, vec![true, false]);
    }

    #[test]
    fn hand_with_one_finger() {
        let payload = "5 hnd 1 0 0.9 1 1 \
                       10 20 30 1 0 0 0 1 0 0 0 1 \
                       1 2 3 1 0 0 0 1 0 0 0 1 8.0 25 10 30 15 35";
        let frame = decode_frame(payload).unwrap();
        let hand = frame.hand(0);
        assert!(hand.pose.is_tracked());
        assert_eq!(hand.handedness, Handedness::Right);
        assert_eq!(hand.fingers.len(), 1);
        let finger = &hand.fingers[0];
        assert_eq!(finger.tip_radius, 8.0);
        assert_eq!(finger.phalanx_lengths, [25.0, 30.0, 35.0]);
        assert_eq!(finger.phalanx_angles, [10.0, 15.0]);
    }

    #[test]
    fn human_model_with_joints() {
        let payload = "5 hum 1 0 2 \
                       3 0.9 1 2 3 1 0 0 0 1 0 0 0 1 \
                       4 -1 0 0 0 0 0 0 0 0 0 0 0 0";
        let frame = decode_frame(payload).unwrap();
        let human = frame.human(0);
        assert!(human.is_tracked());
        assert_eq!(human.joints.len(), 2);
        assert_eq!(human.joints[0].id, 3);
        assert!(human.joints[0].pose.is_tracked());
        assert!(!human.joints[1].pose.is_tracked());
    }

    #[test]
    fn inertial_body_states() {
        let payload = "5 ibd 2 \
                       0 3 0.02 1 2 3 1 0 0 0 1 0 0 0 1 \
                       1 0 0";
        let frame = decode_frame(payload).unwrap();
        assert!(frame.inertial_body(0).is_tracked());
        assert_eq!(frame.inertial_body(0).drift_error, 0.02);
        assert!(!frame.inertial_body(1).is_tracked());
        assert_eq!(frame.inertial_body(1).loc, [0.0; 3]);
    }

    #[test]
    fn system_status_record() {
        let payload = "5 sst 6 2 14 1 0 3 2 0 120 98 1 110 97";
        let frame = decode_frame(payload).unwrap();
        let status = frame.system_status.unwrap();
        assert_eq!(status.num_cameras, 6);
        assert_eq!(status.num_tracked_bodies, 2);
        assert_eq!(status.num_tracked_markers, 14);
        assert_eq!(status.msg_errors, 1);
        assert_eq!(status.cameras.len(), 2);
        assert_eq!(status.cameras[1].reflections, 110);
    }

    #[test]
    fn calibrated_count_pads_bodies() {
        let payload = "5 bod 1 0 0.5 1 2 3 1 0 0 0 1 0 0 0 1 cal 3";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_bodies(), 3);
        assert!(frame.body(0).pose.is_tracked());
        assert!(!frame.body(2).pose.is_tracked());
        assert_eq!(frame.body(2).id, 2);
    }

    #[test]
    fn body_placed_by_id_with_sentinel_gaps() {
        let payload = "5 bod 1 2 0.5 1 2 3 1 0 0 0 1 0 0 0 1";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_bodies(), 3);
        assert!(!frame.body(0).pose.is_tracked());
        assert_eq!(frame.body(1).id, 1);
        assert!(frame.body(2).pose.is_tracked());
    }

    #[test]
    fn trailing_unknown_group_is_harmless() {
        let payload = "5 mrk 1 1 0.9 1 2 3 newgrp 2 7 8";
        let frame = decode_frame(payload).unwrap();
        assert_eq!(frame.num_markers(), 1);
    }
}
