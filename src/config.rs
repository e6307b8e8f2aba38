// src/config.rs - Adjustable constants of the hand-control mode
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::device::MouseButton;
use crate::error::ConfigError;
use crate::filter::ScreenSize;
use crate::frame::{FrameSize, Handedness};
use crate::gesture::ClassifierThresholds;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub smoothing_factor: f64,
    pub pinch_threshold_px: f64,
    pub fist_fold_count: usize,
    pub active_margin_px: f64,
    pub right_click_hold_secs: f64,
    pub click_debounce_secs: f64,
    pub click_button: MouseButton,
    pub screen_width: u32,
    pub screen_height: u32,
    /// Detector runs on a mirror-flipped frame.
    pub mirrored_input: bool,
    /// Physical hand that steers the cursor; the other one clicks.
    pub pointer_hand: Handedness,
    pub min_hand_confidence: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 5.0,
            pinch_threshold_px: 30.0,
            fist_fold_count: 3,
            active_margin_px: 0.0,
            right_click_hold_secs: 0.5,
            click_debounce_secs: 0.5,
            click_button: MouseButton::Left,
            screen_width: 1920,
            screen_height: 1080,
            mirrored_input: true,
            pointer_hand: Handedness::Right,
            min_hand_confidence: 0.0,
        }
    }
}

impl ControlConfig {
    const APP_DIR: &'static str = "gesture-cursor";
    const FILE_NAME: &'static str = "config.json";

    /// `<config dir>/gesture-cursor/config.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", Self::APP_DIR)
            .map(|dirs| dirs.config_dir().join(Self::FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(Self::FILE_NAME))
    }

    /// Loads a config file. A missing file yields defaults; missing fields
    /// take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_factor >= 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing_factor));
        }
        let positive = [
            ("pinch_threshold_px", self.pinch_threshold_px),
            ("right_click_hold_secs", self.right_click_hold_secs),
            ("click_debounce_secs", self.click_debounce_secs),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        if !(1..=4).contains(&self.fist_fold_count) {
            return Err(ConfigError::InvalidFoldCount(self.fist_fold_count));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::InvalidScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if !(self.active_margin_px >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "active_margin_px",
                value: self.active_margin_px,
            });
        }
        Ok(())
    }

    /// Checks that the active margin leaves a usable region for a given capture size.
    pub fn validate_frame(&self, size: FrameSize) -> Result<(), ConfigError> {
        let margin = self.active_margin_px;
        if margin * 2.0 >= size.width as f64 || margin * 2.0 >= size.height as f64 {
            return Err(ConfigError::MarginTooLarge {
                margin,
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    pub fn screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    pub fn thresholds(&self) -> ClassifierThresholds {
        ClassifierThresholds {
            pinch_px: self.pinch_threshold_px,
            fist_folds: self.fist_fold_count,
        }
    }
}
