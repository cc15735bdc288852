//! SMART strategy
//!
//! Follows candidates from an external [`TargetingProvider`]. With no
//! candidate available the step is a plain RANDOM step, so SMART is never
//! worse than RANDOM.
//!
//! [`TargetingProvider`]: crate::traits::TargetingProvider

use rand::Rng;

use super::random::RandomStrategy;
use super::strategy::{MotionStrategy, RawStep, StepContext};
use crate::config::MotionMode;

/// Candidate follower with RANDOM fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartStrategy {
    fallback: RandomStrategy,
    fallback_steps: u32,
}

impl SmartStrategy {
    pub const fn new() -> Self {
        Self {
            fallback: RandomStrategy::new(),
            fallback_steps: 0,
        }
    }

    /// Steps taken without a candidate since the last reset
    pub fn fallback_steps(&self) -> u32 {
        self.fallback_steps
    }
}

impl MotionStrategy for SmartStrategy {
    fn mode(&self) -> MotionMode {
        MotionMode::Smart
    }

    fn reset(&mut self) {
        self.fallback.reset();
        self.fallback_steps = 0;
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> RawStep {
        match ctx.targeting.candidate() {
            Some(candidate) => {
                let dwell_ms = ctx
                    .rng
                    .gen_range(ctx.params.dwell_ms_min..=ctx.params.dwell_ms_max);
                RawStep {
                    target: ctx.range.clamp(candidate),
                    speed_deg_per_sec: ctx.params.speed_deg_per_sec,
                    dwell_ms,
                }
            }
            None => {
                self.fallback_steps = self.fallback_steps.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::trace!("No target candidate, random fallback #{}", self.fallback_steps);
                self.fallback.step(ctx)
            }
        }
    }
}
