//! Motion strategy abstraction
//!
//! Each motion mode is one implementation of [`MotionStrategy`]. The engine
//! picks the implementation for the active mode and never branches on mode
//! inside the step logic, so new modes only add an implementation.

use rand::RngCore;

use crate::config::{EffectiveParams, MotionMode};
use crate::safety::{Angles, SafeRange};
use crate::traits::TargetingProvider;

/// Everything a strategy may read or draw from for one step
pub struct StepContext<'a> {
    /// Parameters in effect
    pub params: &'a EffectiveParams,
    /// Safe range for the current config
    pub range: &'a SafeRange,
    /// Where the head is now (last commanded target)
    pub current: Angles,
    /// Random source
    pub rng: &'a mut dyn RngCore,
    /// External target source (SMART only)
    pub targeting: &'a mut dyn TargetingProvider,
}

/// Raw strategy output, before clamping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawStep {
    /// Proposed target; clamped by the engine
    pub target: Angles,
    /// Transition speed (deg/s)
    pub speed_deg_per_sec: f32,
    /// Dwell after reaching the target (ms)
    pub dwell_ms: u16,
}

/// One motion mode
pub trait MotionStrategy {
    /// Mode this strategy implements
    fn mode(&self) -> MotionMode;

    /// Return to the initial state (start of a run or a mode switch)
    fn reset(&mut self);

    /// Produce the next target
    fn step(&mut self, ctx: &mut StepContext<'_>) -> RawStep;
}
