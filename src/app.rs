// src/app.rs - Outer application modes and the hand-control mode lifecycle
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::ControlConfig;
use crate::control::{CursorController, FrameOutcome};
use crate::detector::{require_model_asset, LandmarkSource};
use crate::device::{dispatch, DeviceSink, DispatchReport};
use crate::frame::{FrameSize, LandmarkFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Menu,
    Control,
}

/// What one frame of the control mode decided and how the sink took it.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub outcome: FrameOutcome,
    pub dispatch: DispatchReport,
    /// The detector failed on this frame and it was handled as tracking lost.
    pub detector_failed: bool,
}

#[derive(Debug)]
pub enum Tick {
    /// Not in a device-driving mode.
    Idle,
    Frame(FrameReport),
    EndOfStream,
}

/// Hand-control mode: pulls landmark frames, runs the controller and is the
/// sole writer to the device sink while active.
pub struct ControlMode<S: LandmarkSource> {
    controller: CursorController,
    source: S,
    last_frame: Option<(f64, FrameSize)>,
}

impl<S: LandmarkSource> ControlMode<S> {
    pub fn new(config: ControlConfig, source: S) -> Result<Self> {
        let controller = CursorController::new(config).context("Invalid hand-control configuration")?;
        Ok(Self {
            controller,
            source,
            last_frame: None,
        })
    }

    /// Like [`ControlMode::new`], but first requires the detector model when one is named.
    pub fn initialize(config: ControlConfig, model: Option<&Path>, source: S) -> Result<Self> {
        if let Some(model) = model {
            require_model_asset(model)?;
        }
        Self::new(config, source)
    }

    pub fn controller(&self) -> &CursorController {
        &self.controller
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn enter(&mut self) {
        info!("Entering hand-control mode");
        self.controller.reset();
        self.last_frame = None;
    }

    /// Lets go of any held button so leaving the mode never leaves it down.
    pub fn exit(&mut self, sink: &mut dyn DeviceSink) -> DispatchReport {
        info!("Leaving hand-control mode");
        let actions = self.controller.release();
        dispatch(sink, &actions)
    }

    pub fn step(&mut self, sink: &mut dyn DeviceSink) -> Tick {
        let (frame, detector_failed) = match self.source.next_frame() {
            Ok(Some(frame)) => (frame, false),
            Ok(None) => return Tick::EndOfStream,
            Err(e) => {
                warn!("Landmark detection failed: {}", e);
                match self.last_frame {
                    Some((timestamp, size)) => (LandmarkFrame::empty(timestamp, size), true),
                    // Nothing seen yet, so nothing can be held down.
                    None => {
                        return Tick::Frame(FrameReport {
                            detector_failed: true,
                            ..Default::default()
                        })
                    }
                }
            }
        };

        self.last_frame = Some((frame.timestamp, frame.size));
        let outcome = self.controller.process(&frame);
        let dispatch = dispatch(sink, &outcome.actions);

        Tick::Frame(FrameReport {
            outcome,
            dispatch,
            detector_failed,
        })
    }
}

/// Top-level mode switcher. Only the control mode ever emits device actions.
pub struct GestureApp<S: LandmarkSource> {
    mode: AppMode,
    control: Option<ControlMode<S>>,
    disabled_reason: Option<String>,
}

impl<S: LandmarkSource> GestureApp<S> {
    /// Starts in the menu. A failed control-mode initialisation leaves the
    /// app running with that mode disabled.
    pub fn new(control: Result<ControlMode<S>>) -> Self {
        let (control, disabled_reason) = match control {
            Ok(control) => (Some(control), None),
            Err(e) => {
                warn!("Hand control disabled: {:#}", e);
                (None, Some(format!("{:#}", e)))
            }
        };
        Self {
            mode: AppMode::Menu,
            control,
            disabled_reason,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn control_available(&self) -> bool {
        self.control.is_some()
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }

    pub fn control(&self) -> Option<&ControlMode<S>> {
        self.control.as_ref()
    }

    pub fn switch_to(&mut self, mode: AppMode, sink: &mut dyn DeviceSink) -> Result<()> {
        if mode == self.mode {
            return Ok(());
        }

        match mode {
            AppMode::Control => {
                let Some(control) = self.control.as_mut() else {
                    bail!(
                        "Hand control disabled: {}",
                        self.disabled_reason.as_deref().unwrap_or("not initialised")
                    );
                };
                control.enter();
            }
            AppMode::Menu => {
                if let Some(control) = self.control.as_mut() {
                    control.exit(sink);
                }
            }
        }

        self.mode = mode;
        Ok(())
    }

    pub fn tick(&mut self, sink: &mut dyn DeviceSink) -> Tick {
        match (self.mode, self.control.as_mut()) {
            (AppMode::Control, Some(control)) => control.step(sink),
            _ => Tick::Idle,
        }
    }

    /// Returns to the menu, releasing anything the control mode holds.
    pub fn shutdown(&mut self, sink: &mut dyn DeviceSink) -> Result<()> {
        self.switch_to(AppMode::Menu, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceAction, RecordingSink};
    use crate::frame::fixtures::{frame, hand, Pose};
    use crate::frame::Handedness;
    use crate::session::SessionReader;

    fn app(frames: Vec<LandmarkFrame>) -> GestureApp<SessionReader> {
        let source = SessionReader::from_frames(frames);
        GestureApp::new(ControlMode::new(ControlConfig::default(), source))
    }

    fn pinch_frames() -> Vec<LandmarkFrame> {
        (0..5)
            .map(|i| frame(i as f64 * 0.1, vec![hand(Handedness::Right, Pose::PinchIndex)], true))
            .collect()
    }

    #[test]
    fn menu_never_touches_the_sink() {
        let mut app = app(pinch_frames());
        let mut sink = RecordingSink::new();
        assert!(matches!(app.tick(&mut sink), Tick::Idle));
        assert!(sink.actions.is_empty());
    }

    #[test]
    fn leaving_control_releases_drag() {
        let mut app = app(pinch_frames());
        let mut sink = RecordingSink::new();
        app.switch_to(AppMode::Control, &mut sink).unwrap();
        app.tick(&mut sink);
        app.tick(&mut sink);
        assert_eq!(sink.take(), vec![DeviceAction::MouseDown]);

        app.switch_to(AppMode::Menu, &mut sink).unwrap();
        assert_eq!(sink.take(), vec![DeviceAction::MouseUp]);
    }

    #[test]
    fn reentering_control_starts_clean() {
        let mut app = app(pinch_frames());
        let mut sink = RecordingSink::new();
        app.switch_to(AppMode::Control, &mut sink).unwrap();
        app.tick(&mut sink);
        app.shutdown(&mut sink).unwrap();
        sink.take();

        app.switch_to(AppMode::Control, &mut sink).unwrap();
        let state = app.control().unwrap().controller().state();
        assert!(!state.drag_engaged);
        app.tick(&mut sink);
        // Fresh state means the still-pinched hand presses again.
        assert_eq!(sink.take(), vec![DeviceAction::MouseDown]);
    }

    #[test]
    fn missing_model_disables_control() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("hand_landmarker.task");
        let control = ControlMode::initialize(
            ControlConfig::default(),
            Some(&model),
            SessionReader::from_frames(Vec::new()),
        );
        let mut app = GestureApp::new(control);
        let mut sink = RecordingSink::new();

        assert!(!app.control_available());
        assert!(app.disabled_reason().unwrap().contains("hand_landmarker.task"));
        assert!(app.switch_to(AppMode::Control, &mut sink).is_err());
        assert_eq!(app.mode(), AppMode::Menu);
    }

    #[test]
    fn end_of_stream_is_reported() {
        let mut app = app(Vec::new());
        let mut sink = RecordingSink::new();
        app.switch_to(AppMode::Control, &mut sink).unwrap();
        assert!(matches!(app.tick(&mut sink), Tick::EndOfStream));
    }
}
