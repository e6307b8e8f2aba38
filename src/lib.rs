// src/lib.rs - Hand-gesture cursor control
//
// Landmark frames from an external hand/face detector are classified into
// gestures, mapped to hand roles, and fed through a cursor state machine that
// emits pointer actions for the host's pointing device.
pub mod app;
pub mod config;
pub mod control;
pub mod detector;
pub mod device;
pub mod error;
pub mod export;
pub mod filter;
pub mod frame;
pub mod gesture;
pub mod roles;
pub mod session;

pub use app::{AppMode, ControlMode, FrameReport, GestureApp, Tick};
pub use config::ControlConfig;
pub use control::{CursorController, CursorState, FrameOutcome};
pub use detector::LandmarkSource;
pub use device::{DeviceAction, DeviceSink, MouseButton};
pub use frame::{FrameSize, HandObservation, Handedness, LandmarkFrame};
pub use roles::Role;
