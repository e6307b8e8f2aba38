// src/gesture.rs - Stateless per-frame gesture predicates over a single hand
use nalgebra::distance;

use crate::frame::{landmarks, FrameSize, HandObservation, LandmarkFrame};

/// Fingertip pairs that form the pinches the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pinch {
    ThumbIndex,
    ThumbMiddle,
}

impl Pinch {
    fn tips(self) -> (usize, usize) {
        match self {
            Pinch::ThumbIndex => (landmarks::THUMB_TIP, landmarks::INDEX_TIP),
            Pinch::ThumbMiddle => (landmarks::THUMB_TIP, landmarks::MIDDLE_TIP),
        }
    }
}

/// Thresholds the classifier is parameterised by.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierThresholds {
    /// Pixel distance (capture-frame space) below which a pinch is engaged.
    pub pinch_px: f64,
    /// Folded fingers (out of four) needed for a fist.
    pub fist_folds: usize,
}

/// Euclidean distance between two keypoints in pixel space.
pub fn keypoint_distance(hand: &HandObservation, a: usize, b: usize, size: FrameSize) -> f64 {
    distance(&hand.pixel(a, size), &hand.pixel(b, size))
}

pub fn pinch_distance(hand: &HandObservation, pinch: Pinch, size: FrameSize) -> f64 {
    let (a, b) = pinch.tips();
    keypoint_distance(hand, a, b, size)
}

pub fn is_pinch_engaged(hand: &HandObservation, pinch: Pinch, size: FrameSize, threshold_px: f64) -> bool {
    pinch_distance(hand, pinch, size) < threshold_px
}

/// Number of non-thumb fingers whose tip is closer to the wrist than their
/// PIP joint. Distance based, so it holds up when the hand is tilted.
pub fn folded_fingers(hand: &HandObservation, size: FrameSize) -> usize {
    landmarks::FINGERS
        .iter()
        .filter(|(tip, pip)| {
            keypoint_distance(hand, *tip, landmarks::WRIST, size)
                < keypoint_distance(hand, *pip, landmarks::WRIST, size)
        })
        .count()
}

pub fn is_fist(hand: &HandObservation, size: FrameSize, min_folds: usize) -> bool {
    folded_fingers(hand, size) >= min_folds
}

/// Gaze safety. Presence only: a detected face counts as attention.
// TODO: gate on head yaw once the face detector exposes a pose estimate.
pub fn gaze_present(frame: &LandmarkFrame) -> bool {
    frame.face_present
}

/// All predicates for one hand, evaluated once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandGestures {
    pub pinch_index: bool,
    pub pinch_middle: bool,
    pub fist: bool,
}

impl HandGestures {
    pub fn classify(hand: &HandObservation, size: FrameSize, thresholds: &ClassifierThresholds) -> Self {
        Self {
            pinch_index: is_pinch_engaged(hand, Pinch::ThumbIndex, size, thresholds.pinch_px),
            pinch_middle: is_pinch_engaged(hand, Pinch::ThumbMiddle, size, thresholds.pinch_px),
            fist: is_fist(hand, size, thresholds.fist_folds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::fixtures::{self, Pose, SIZE};
    use crate::frame::Handedness;
    use nalgebra::{Point2, Rotation2};

    const THRESHOLDS: ClassifierThresholds = ClassifierThresholds {
        pinch_px: 30.0,
        fist_folds: 3,
    };

    #[test]
    fn fist_is_detected() {
        let hand = fixtures::hand(Handedness::Left, Pose::Fist);
        assert_eq!(folded_fingers(&hand, SIZE), 4);
        assert!(is_fist(&hand, SIZE, 3));
    }

    #[test]
    fn open_hand_is_not_a_fist() {
        let hand = fixtures::hand(Handedness::Left, Pose::Open);
        assert_eq!(folded_fingers(&hand, SIZE), 0);
        assert!(!is_fist(&hand, SIZE, 3));
    }

    #[test]
    fn fist_survives_rotation() {
        // Rotate the fist 90 degrees about its wrist on a square frame.
        let size = FrameSize { width: 480, height: 480 };
        let fist = fixtures::hand(Handedness::Left, Pose::Fist);
        let wrist = fist.keypoint(landmarks::WRIST);
        let rot = Rotation2::new(std::f64::consts::FRAC_PI_2);
        let rotated: Vec<Point2<f64>> = fist
            .keypoints()
            .iter()
            .map(|p| wrist + rot * (p - wrist))
            .collect();
        let hand = HandObservation::new(Handedness::Left, 0.9, rotated).unwrap();
        assert!(is_fist(&hand, size, 3));
    }

    #[test]
    fn pinches_are_exclusive_in_fixtures() {
        let g = HandGestures::classify(&fixtures::hand(Handedness::Right, Pose::PinchIndex), SIZE, &THRESHOLDS);
        assert!(g.pinch_index && !g.pinch_middle && !g.fist);

        let g = HandGestures::classify(&fixtures::hand(Handedness::Right, Pose::PinchMiddle), SIZE, &THRESHOLDS);
        assert!(!g.pinch_index && g.pinch_middle);

        let g = HandGestures::classify(&fixtures::hand(Handedness::Right, Pose::Open), SIZE, &THRESHOLDS);
        assert_eq!(g, HandGestures::default());
    }

    #[test]
    fn pinch_threshold_is_in_frame_pixels() {
        let hand = fixtures::hand(Handedness::Right, Pose::PinchIndex);
        let d = pinch_distance(&hand, Pinch::ThumbIndex, SIZE);
        assert!((d - 4.0).abs() < 1e-6, "distance was {d}");
        // The same normalized pose at 4x the resolution is four times as far apart.
        let big = FrameSize { width: 2560, height: 1920 };
        assert!(!is_pinch_engaged(&hand, Pinch::ThumbIndex, big, 15.0));
        assert!(is_pinch_engaged(&hand, Pinch::ThumbIndex, SIZE, 15.0));
    }

    #[test]
    fn gaze_follows_face_presence() {
        assert!(gaze_present(&fixtures::frame(0.0, Vec::new(), true)));
        assert!(!gaze_present(&fixtures::frame(0.0, Vec::new(), false)));
    }
}
