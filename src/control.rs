// src/control.rs - Cursor control state machine: hand gestures in, pointer actions out
use tracing::{debug, info};

use crate::config::ControlConfig;
use crate::device::{DeviceAction, MouseButton};
use crate::error::ConfigError;
use crate::filter::{ActiveRegion, MotionFilter};
use crate::frame::{landmarks, HandObservation, LandmarkFrame};
use crate::gesture::{self, ClassifierThresholds, HandGestures};
use crate::roles::RoleAssignor;

/// Memory carried between frames. Owned by one [`CursorController`] and
/// reset whenever the control mode is entered.
#[derive(Debug, Clone)]
pub struct CursorState {
    pub cursor: MotionFilter,
    pub drag_engaged: bool,
    /// Timestamp of the first frame of the current dual-fist hold.
    pub hold_started: Option<f64>,
    /// Right-click already fired during this hold.
    pub right_click_fired: bool,
    pub last_click: Option<f64>,
}

impl CursorState {
    pub fn new(smoothing_factor: f64) -> Self {
        Self {
            cursor: MotionFilter::new(smoothing_factor),
            drag_engaged: false,
            hold_started: None,
            right_click_fired: false,
            last_click: None,
        }
    }
}

/// Why an engaged drag was let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    PinchOpened,
    HandLost,
    GazeLost,
    FistGate,
    ModeExit,
}

/// Everything decided for one frame, including what a display layer needs.
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub timestamp: f64,
    pub actions: Vec<DeviceAction>,
    pub pointer_present: bool,
    pub actor_present: bool,
    pub gaze: bool,
    pub gate_active: bool,
    /// Dual-fist hold fill, `min(elapsed / duration, 1)`; zero when not holding.
    pub hold_progress: f64,
    pub drag_engaged: bool,
}

pub struct CursorController {
    config: ControlConfig,
    assignor: RoleAssignor,
    thresholds: ClassifierThresholds,
    state: CursorState,
}

impl CursorController {
    pub fn new(config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            assignor: RoleAssignor::new(
                config.mirrored_input,
                config.pointer_hand,
                config.min_hand_confidence,
            ),
            thresholds: config.thresholds(),
            state: CursorState::new(config.smoothing_factor),
            config,
        })
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn state(&self) -> &CursorState {
        &self.state
    }

    /// Clean slate for mode entry.
    pub fn reset(&mut self) {
        self.state = CursorState::new(self.config.smoothing_factor);
    }

    /// Resolves an engaged drag, e.g. when leaving the control mode.
    pub fn release(&mut self) -> Vec<DeviceAction> {
        let mut actions = Vec::new();
        self.release_drag(ReleaseReason::ModeExit, &mut actions);
        actions
    }

    pub fn hold_progress(&self, now: f64) -> f64 {
        match self.state.hold_started {
            Some(started) => ((now - started).max(0.0) / self.config.right_click_hold_secs).min(1.0),
            None => 0.0,
        }
    }

    /// Evaluates one frame. Channels run in a fixed order: drag release,
    /// dual-fist right-click, pointer movement, then press and click. A drag
    /// is therefore always released before the next cursor move.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutcome {
        let now = frame.timestamp;
        let roles = self.assignor.assign(&frame.hands);
        let gaze = gesture::gaze_present(frame);

        let pointer = roles.pointer.map(|h| (h, self.classify(h, frame)));
        let actor = roles.actor.map(|h| (h, self.classify(h, frame)));

        let gate_active = matches!(
            (pointer, actor),
            (Some((_, p)), Some((_, a))) if p.fist && a.fist
        );

        let mut actions = Vec::new();

        if self.state.drag_engaged {
            let reason = if gate_active {
                Some(ReleaseReason::FistGate)
            } else {
                match actor {
                    None => Some(ReleaseReason::HandLost),
                    Some(_) if !gaze => Some(ReleaseReason::GazeLost),
                    Some((_, g)) if !g.pinch_index => Some(ReleaseReason::PinchOpened),
                    Some(_) => None,
                }
            };
            if let Some(reason) = reason {
                self.release_drag(reason, &mut actions);
            }
        }

        let hold_progress = self.update_hold(gate_active, gaze, now, &mut actions);

        if !gate_active {
            if let Some((hand, _)) = pointer {
                actions.push(self.move_cursor(hand, frame));
            }

            if let Some((_, g)) = actor.filter(|_| gaze) {
                self.press_or_click(g, now, &mut actions);
            }
        }

        FrameOutcome {
            timestamp: now,
            actions,
            pointer_present: pointer.is_some(),
            actor_present: actor.is_some(),
            gaze,
            gate_active,
            hold_progress,
            drag_engaged: self.state.drag_engaged,
        }
    }

    fn classify(&self, hand: &HandObservation, frame: &LandmarkFrame) -> HandGestures {
        HandGestures::classify(hand, frame.size, &self.thresholds)
    }

    fn release_drag(&mut self, reason: ReleaseReason, actions: &mut Vec<DeviceAction>) {
        if self.state.drag_engaged {
            info!("Drag released ({:?})", reason);
            self.state.drag_engaged = false;
            actions.push(DeviceAction::MouseUp);
        }
    }

    fn update_hold(
        &mut self,
        gate_active: bool,
        gaze: bool,
        now: f64,
        actions: &mut Vec<DeviceAction>,
    ) -> f64 {
        if !gate_active {
            if self.state.hold_started.take().is_some() {
                debug!("Dual-fist hold ended");
            }
            self.state.right_click_fired = false;
            return 0.0;
        }

        let started = *self.state.hold_started.get_or_insert(now);
        let elapsed = (now - started).max(0.0);

        if elapsed >= self.config.right_click_hold_secs && !self.state.right_click_fired && gaze {
            info!("Dual-fist hold complete after {:.2}s, right click", elapsed);
            self.state.right_click_fired = true;
            actions.push(DeviceAction::Click(MouseButton::Right));
        }

        self.hold_progress(now)
    }

    fn move_cursor(&mut self, hand: &HandObservation, frame: &LandmarkFrame) -> DeviceAction {
        let screen = self.config.screen();
        let region = ActiveRegion::inset(frame.size, self.config.active_margin_px);
        let target = region.map_to_screen(hand.pixel(landmarks::INDEX_TIP, frame.size), screen);
        let p = screen.clamp(self.state.cursor.update(target));
        DeviceAction::MoveTo { x: p.x, y: p.y }
    }

    fn press_or_click(&mut self, g: HandGestures, now: f64, actions: &mut Vec<DeviceAction>) {
        if g.pinch_index {
            if !self.state.drag_engaged {
                info!("Drag engaged");
                self.state.drag_engaged = true;
                actions.push(DeviceAction::MouseDown);
            }
        } else if g.pinch_middle {
            let ready = self
                .state
                .last_click
                .map_or(true, |last| now - last >= self.config.click_debounce_secs);
            if ready {
                debug!("Click ({:?})", self.config.click_button);
                self.state.last_click = Some(now);
                actions.push(DeviceAction::Click(self.config.click_button));
            }
        }
    }
}
