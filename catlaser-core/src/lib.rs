//! Board-agnostic control core for the Catlaser pan/tilt toy
//!
//! This crate contains all decision logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (actuator, laser, clock, targeting)
//! - Weekly schedule resolution
//! - Session cap and cooldown enforcement
//! - Motion strategies and the safety clamp
//! - Configuration types, validation and snapshots
//!
//! Time is always an input. Nothing in here samples a clock, so every
//! tick is deterministic and replayable from its inputs.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod motion;
#[cfg(feature = "serde")]
pub mod remote;
pub mod safety;
pub mod schedule;
pub mod session;
pub mod traits;

pub use config::{Config, ConfigError, EffectiveParams, MotionMode, PresetId, Weekday};
pub use controller::{drive, Controller, ControllerStatus, DriveError, TickOutput};
pub use motion::{MotionCommand, MotionEngine};
pub use safety::{clamp, Angles};
pub use schedule::{resolve, ScheduleDecision};
pub use session::{RunDecision, SessionGuard, SessionState};
