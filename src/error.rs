// src/error.rs - Error types surfaced by the gesture-cursor core
use std::path::PathBuf;
use thiserror::Error;

/// Malformed landmark input.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("hand observation needs {expected} keypoints, got {found}")]
    KeypointCount { expected: usize, found: usize },

    #[error("keypoint {index} has a non-finite coordinate")]
    NonFiniteKeypoint { index: usize },

    #[error("frame size must be non-zero, got {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("smoothing factor must be >= 1, got {0}")]
    InvalidSmoothing(f64),

    #[error("active margin {margin}px leaves no active region in a {width}x{height} frame")]
    MarginTooLarge { margin: f64, width: u32, height: u32 },

    #[error("{name} out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("fist fold count must be within 1..=4, got {0}")]
    InvalidFoldCount(usize),

    #[error("screen size must be non-zero, got {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Refusal reported by the pointing-device driver.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    #[error("fail-safe triggered, action aborted")]
    FailSafe,

    #[error("device rejected action: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("landmark model not found at {0}")]
    ModelMissing(PathBuf),

    #[error("landmark detection failed: {0}")]
    Detection(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
