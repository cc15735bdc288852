//! RANDOM strategy
//!
//! Independent uniform draws over the safe range. Keeps no state between
//! steps.

use rand::Rng;

use super::strategy::{MotionStrategy, RawStep, StepContext};
use crate::config::MotionMode;
use crate::safety::Angles;

/// Uniform random targets and dwell
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl MotionStrategy for RandomStrategy {
    fn mode(&self) -> MotionMode {
        MotionMode::Random
    }

    fn reset(&mut self) {}

    fn step(&mut self, ctx: &mut StepContext<'_>) -> RawStep {
        let range = ctx.range;
        let pan = ctx.rng.gen_range(range.pan.lo..=range.pan.hi);
        let tilt = ctx.rng.gen_range(range.tilt.lo..=range.tilt.hi);
        let dwell_ms = ctx
            .rng
            .gen_range(ctx.params.dwell_ms_min..=ctx.params.dwell_ms_max);

        RawStep {
            target: Angles::new(pan, tilt),
            speed_deg_per_sec: ctx.params.speed_deg_per_sec,
            dwell_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EffectiveParams};
    use crate::safety::SafeRange;
    use crate::traits::NoTargeting;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_draws_stay_in_range_and_cover_edges() {
        let config = Config::default();
        let params = EffectiveParams::from_config(&config);
        let range = SafeRange::from_config(&config);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut targeting = NoTargeting;
        let mut strategy = RandomStrategy::new();

        let (mut min_pan, mut max_pan) = (i16::MAX, i16::MIN);
        for _ in 0..5000 {
            let mut ctx = StepContext {
                params: &params,
                range: &range,
                current: Angles::default(),
                rng: &mut rng,
                targeting: &mut targeting,
            };
            let step = strategy.step(&mut ctx);
            assert!(range.contains(step.target));
            assert!((150..=900).contains(&step.dwell_ms));
            assert_eq!(step.speed_deg_per_sec, 70.0);
            min_pan = min_pan.min(step.target.pan);
            max_pan = max_pan.max(step.target.pan);
        }

        assert_eq!((min_pan, max_pan), (41, 139));
    }
}
