// Shared hand poses for the integration tests (640x480 capture frame).
#![allow(dead_code)]

use gesture_cursor::{FrameSize, HandObservation, Handedness, LandmarkFrame};
use nalgebra::Point2;

pub const SIZE: FrameSize = FrameSize {
    width: 640,
    height: 480,
};

/// Default config is mirrored with a right-handed pointer, so the detector's
/// "Left" label is the Pointer and "Right" is the Actor.
pub const POINTER: Handedness = Handedness::Left;
pub const ACTOR: Handedness = Handedness::Right;

#[derive(Debug, Clone, Copy)]
pub enum Pose {
    Open,
    Fist,
    PinchIndex,
    PinchMiddle,
}

const OPEN: [[f64; 2]; 21] = [
    [0.26, 0.90],
    [0.19, 0.85],
    [0.15, 0.78],
    [0.12, 0.72],
    [0.10, 0.68],
    [0.18, 0.70],
    [0.18, 0.60],
    [0.18, 0.52],
    [0.18, 0.45],
    [0.25, 0.70],
    [0.25, 0.58],
    [0.25, 0.50],
    [0.25, 0.43],
    [0.31, 0.71],
    [0.31, 0.61],
    [0.31, 0.54],
    [0.31, 0.48],
    [0.37, 0.73],
    [0.37, 0.65],
    [0.37, 0.59],
    [0.37, 0.54],
];

pub fn hand(label: Handedness, pose: Pose, dx: f64) -> HandObservation {
    let mut pts = OPEN;
    match pose {
        Pose::Open => {}
        Pose::Fist => {
            pts[8] = [0.19, 0.78];
            pts[12] = [0.25, 0.78];
            pts[16] = [0.30, 0.79];
            pts[20] = [0.35, 0.80];
        }
        Pose::PinchIndex => pts[4] = [0.185, 0.455],
        Pose::PinchMiddle => pts[4] = [0.255, 0.435],
    }
    let points = pts.iter().map(|[x, y]| Point2::new(x + dx, *y)).collect();
    HandObservation::new(label, 0.9, points).unwrap()
}

pub fn pointer(pose: Pose) -> HandObservation {
    hand(POINTER, pose, 0.4)
}

pub fn actor(pose: Pose) -> HandObservation {
    hand(ACTOR, pose, 0.0)
}

pub fn frame(timestamp: f64, hands: Vec<HandObservation>, face: bool) -> LandmarkFrame {
    LandmarkFrame::new(timestamp, SIZE, hands, face)
}
