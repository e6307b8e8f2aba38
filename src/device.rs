// src/device.rs - Pointer actions and the sink that executes them
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// A single primitive handed to the pointing-device driver. `MoveTo`
/// coordinates are screen pixels, already clamped to the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceAction {
    MoveTo { x: f64, y: f64 },
    MouseDown,
    MouseUp,
    Click(MouseButton),
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceAction::MoveTo { x, y } => write!(f, "move({:.0},{:.0})", x, y),
            DeviceAction::MouseDown => write!(f, "down"),
            DeviceAction::MouseUp => write!(f, "up"),
            DeviceAction::Click(MouseButton::Left) => write!(f, "click-left"),
            DeviceAction::Click(MouseButton::Right) => write!(f, "click-right"),
        }
    }
}

/// The host pointing-device driver.
pub trait DeviceSink {
    fn execute(&mut self, action: &DeviceAction) -> Result<(), DeviceError>;
}

/// Outcome of pushing one frame's actions through a sink.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub executed: usize,
    pub failures: Vec<(DeviceAction, DeviceError)>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Executes actions in order. A refused action is logged and dropped; the
/// remaining actions are still attempted and nothing is retried.
pub fn dispatch(sink: &mut dyn DeviceSink, actions: &[DeviceAction]) -> DispatchReport {
    let mut report = DispatchReport::default();
    for action in actions {
        match sink.execute(action) {
            Ok(()) => report.executed += 1,
            Err(e) => {
                warn!("Device action {} dropped: {}", action, e);
                report.failures.push((*action, e));
            }
        }
    }
    report
}

/// Keeps every executed action in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub actions: Vec<DeviceAction>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<DeviceAction> {
        std::mem::take(&mut self.actions)
    }
}

impl DeviceSink for RecordingSink {
    fn execute(&mut self, action: &DeviceAction) -> Result<(), DeviceError> {
        self.actions.push(*action);
        Ok(())
    }
}

/// Dry-run driver: logs actions instead of moving the real pointer.
/// Cursor moves are logged at debug level to keep output readable.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl DeviceSink for LoggingSink {
    fn execute(&mut self, action: &DeviceAction) -> Result<(), DeviceError> {
        match action {
            DeviceAction::MoveTo { .. } => tracing::debug!("device: {}", action),
            _ => info!("device: {}", action),
        }
        Ok(())
    }
}
