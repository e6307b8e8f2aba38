// src/frame.rs - Per-frame landmark data handed over by the hand/face detector
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FrameError;

pub const LANDMARK_COUNT: usize = 21;

/// At most this many hands are considered per frame; extra detections are dropped.
pub const MAX_HANDS: usize = 2;

/// Hand landmark indices (detector convention, positionally fixed).
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_PIP: usize = 14;
    pub const RING_TIP: usize = 16;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_TIP: usize = 20;

    /// (tip, pip) pairs of the four non-thumb fingers.
    pub const FINGERS: [(usize, usize); 4] = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
}

/// Handedness label as reported by the detector. Whether it matches the
/// user's physical hand depends on the mirror convention (see `roles`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidFrameSize { width, height });
        }
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone)]
pub struct HandObservation {
    pub handedness: Handedness,
    pub confidence: f64,
    keypoints: [Point2<f64>; LANDMARK_COUNT],
}

impl HandObservation {
    /// Builds an observation from normalized keypoints (x, y in [0, 1] of the frame).
    pub fn new(
        handedness: Handedness,
        confidence: f64,
        keypoints: Vec<Point2<f64>>,
    ) -> Result<Self, FrameError> {
        if let Some(index) = keypoints
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(FrameError::NonFiniteKeypoint { index });
        }

        let found = keypoints.len();
        let keypoints: [Point2<f64>; LANDMARK_COUNT] =
            keypoints.try_into().map_err(|_| FrameError::KeypointCount {
                expected: LANDMARK_COUNT,
                found,
            })?;

        Ok(Self {
            handedness,
            confidence,
            keypoints,
        })
    }

    pub fn keypoint(&self, index: usize) -> Point2<f64> {
        self.keypoints[index]
    }

    pub fn keypoints(&self) -> &[Point2<f64>] {
        &self.keypoints
    }

    /// Keypoint scaled into pixel space of the capture frame.
    pub fn pixel(&self, index: usize, size: FrameSize) -> Point2<f64> {
        let p = self.keypoints[index];
        Point2::new(p.x * size.width as f64, p.y * size.height as f64)
    }
}

/// One frame of detector output. `timestamp` is monotonic seconds derived
/// from the capture stream, not wall-clock.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    pub timestamp: f64,
    pub size: FrameSize,
    pub hands: Vec<HandObservation>,
    pub face_present: bool,
}

impl LandmarkFrame {
    pub fn new(
        timestamp: f64,
        size: FrameSize,
        mut hands: Vec<HandObservation>,
        face_present: bool,
    ) -> Self {
        if hands.len() > MAX_HANDS {
            debug!("Dropping {} extra hand detections", hands.len() - MAX_HANDS);
            hands.truncate(MAX_HANDS);
        }
        Self {
            timestamp,
            size,
            hands,
            face_present,
        }
    }

    /// A frame in which tracking was lost: no hands, no face.
    pub fn empty(timestamp: f64, size: FrameSize) -> Self {
        Self::new(timestamp, size, Vec::new(), false)
    }
}

/// Serialized form of a hand, as written to recorded sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRecord {
    pub label: Handedness,
    pub confidence: f64,
    pub keypoints: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub face_present: bool,
    #[serde(default)]
    pub hands: Vec<HandRecord>,
}

impl TryFrom<FrameRecord> for LandmarkFrame {
    type Error = FrameError;

    fn try_from(record: FrameRecord) -> Result<Self, Self::Error> {
        let size = FrameSize::new(record.width, record.height)?;
        let hands = record
            .hands
            .into_iter()
            .map(|hand| {
                let points = hand
                    .keypoints
                    .iter()
                    .map(|[x, y]| Point2::new(*x, *y))
                    .collect();
                HandObservation::new(hand.label, hand.confidence, points)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LandmarkFrame::new(
            record.timestamp,
            size,
            hands,
            record.face_present,
        ))
    }
}

impl From<&LandmarkFrame> for FrameRecord {
    fn from(frame: &LandmarkFrame) -> Self {
        Self {
            timestamp: frame.timestamp,
            width: frame.size.width,
            height: frame.size.height,
            face_present: frame.face_present,
            hands: frame
                .hands
                .iter()
                .map(|hand| HandRecord {
                    label: hand.handedness,
                    confidence: hand.confidence,
                    keypoints: hand.keypoints().iter().map(|p| [p.x, p.y]).collect(),
                })
                .collect(),
        }
    }
}

/// Canned hand poses on a 640x480 frame, shared by the unit tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const SIZE: FrameSize = FrameSize {
        width: 640,
        height: 480,
    };

    #[derive(Debug, Clone, Copy)]
    pub enum Pose {
        Open,
        Fist,
        PinchIndex,
        PinchMiddle,
    }

    const OPEN: [[f64; 2]; LANDMARK_COUNT] = [
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

    pub fn hand(label: Handedness, pose: Pose) -> HandObservation {
        hand_at(label, pose, 0.0)
    }

    /// Same pose shifted horizontally by `dx` (normalized units).
    pub fn hand_at(label: Handedness, pose: Pose, dx: f64) -> HandObservation {
        let mut pts = OPEN;
        match pose {
            Pose::Open => {}
            Pose::Fist => {
                pts[landmarks::INDEX_TIP] = [0.19, 0.78];
                pts[landmarks::MIDDLE_TIP] = [0.25, 0.78];
                pts[landmarks::RING_TIP] = [0.30, 0.79];
                pts[landmarks::PINKY_TIP] = [0.35, 0.80];
            }
            Pose::PinchIndex => pts[landmarks::THUMB_TIP] = [0.185, 0.455],
            Pose::PinchMiddle => pts[landmarks::THUMB_TIP] = [0.255, 0.435],
        }
        let points = pts.iter().map(|[x, y]| Point2::new(x + dx, *y)).collect();
        HandObservation::new(label, 0.9, points).unwrap()
    }

    pub fn frame(timestamp: f64, hands: Vec<HandObservation>, face: bool) -> LandmarkFrame {
        LandmarkFrame::new(timestamp, SIZE, hands, face)
    }
}
