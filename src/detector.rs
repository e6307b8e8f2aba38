// src/detector.rs - Interface to the external hand/face landmark detector
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::DetectorError;
use crate::frame::LandmarkFrame;

/// Anything that yields one landmark frame per captured video frame.
///
/// `Ok(None)` means the stream has ended. A per-frame `Err` is a failed
/// detection for that frame only; callers treat it as tracking lost.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, DetectorError>;
}

/// Checks that the detector's model asset is installed. A missing model
/// makes the control mode unavailable.
pub fn require_model_asset(path: impl AsRef<Path>) -> Result<PathBuf, DetectorError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DetectorError::ModelMissing(path.to_path_buf()));
    }
    info!("Using landmark model {}", path.display());
    Ok(path.to_path_buf())
}
