// src/filter.rs - Cursor smoothing and frame-to-screen mapping
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::frame::FrameSize;

/// Target pointing-device resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    /// Clamps a point into `[0, width) x [0, height)`.
    pub fn clamp(&self, p: Point2<f64>) -> Point2<f64> {
        let max_x = self.width.saturating_sub(1) as f64;
        let max_y = self.height.saturating_sub(1) as f64;
        Point2::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y))
    }
}

/// One exponential smoothing step: `previous + (target - previous) / factor`.
///
/// `factor` >= 1. A factor of 1 follows the target exactly; larger values
/// trade lag for less jitter. Never overshoots the target.
pub fn smooth(target: Point2<f64>, previous: Point2<f64>, factor: f64) -> Point2<f64> {
    previous + (target - previous) / factor
}

/// Stateful wrapper around [`smooth`] holding the last cursor position.
///
/// The first update after construction or [`MotionFilter::reset`] seeds the
/// state with the target itself, so the cursor does not sweep in from (0, 0).
#[derive(Debug, Clone)]
pub struct MotionFilter {
    factor: f64,
    previous: Option<Point2<f64>>,
}

impl MotionFilter {
    pub fn new(factor: f64) -> Self {
        Self {
            factor,
            previous: None,
        }
    }

    pub fn update(&mut self, target: Point2<f64>) -> Point2<f64> {
        let next = match self.previous {
            Some(prev) => smooth(target, prev, self.factor),
            None => target,
        };
        self.previous = Some(next);
        next
    }

    pub fn position(&self) -> Option<Point2<f64>> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

/// Sub-rectangle of the capture frame (pixel space) that spans the whole screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveRegion {
    min: Point2<f64>,
    max: Point2<f64>,
}

impl ActiveRegion {
    /// Frame inset by `margin` pixels on every side. The margin is capped so
    /// the region keeps at least one pixel of extent on each axis.
    pub fn inset(size: FrameSize, margin: f64) -> Self {
        let w = size.width as f64;
        let h = size.height as f64;
        let mx = margin.max(0.0).min((w - 1.0).max(0.0) / 2.0);
        let my = margin.max(0.0).min((h - 1.0).max(0.0) / 2.0);
        Self {
            min: Point2::new(mx, my),
            max: Point2::new(w - mx, h - my),
        }
    }

    pub fn min(&self) -> Point2<f64> {
        self.min
    }

    pub fn max(&self) -> Point2<f64> {
        self.max
    }

    /// Linearly maps a frame pixel onto the screen. Points outside the region
    /// land on the nearest region edge first (dead-zone margin).
    pub fn map_to_screen(&self, pixel: Point2<f64>, screen: ScreenSize) -> Point2<f64> {
        let x = pixel.x.clamp(self.min.x, self.max.x);
        let y = pixel.y.clamp(self.min.y, self.max.y);

        let sx = (x - self.min.x) / (self.max.x - self.min.x) * screen.width as f64;
        let sy = (y - self.min.y) / (self.max.y - self.min.y) * screen.height as f64;

        screen.clamp(Point2::new(sx, sy))
    }
}
