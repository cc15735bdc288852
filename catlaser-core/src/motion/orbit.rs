//! ORBIT strategy
//!
//! Continuous elliptical sweep around the centre of the safe range:
//!
//! ```text
//! pan  = centre_pan  + radius_pan  * cos(phase)
//! tilt = centre_tilt + radius_tilt * sin(phase)
//! ```
//!
//! The radius is a fixed fraction of the half range so the ellipse never
//! touches the margin. The phase advances by a fixed increment per step,
//! capped so the implied angular speed stays within `params.speed`.

use core::f32::consts::TAU;

use super::strategy::{MotionStrategy, RawStep, StepContext};
use super::trig::{cos_q15, mul_q15, sin_q15, PHASE_PER_TURN};
use crate::config::MotionMode;
use crate::safety::{Angles, SafeRange};

/// Phase advance per step (64 steps per revolution)
pub const ORBIT_PHASE_INCREMENT: u16 = 64;

/// Radius as a fraction of the half range (numerator / denominator)
pub const ORBIT_RADIUS_NUM: i32 = 4;
pub const ORBIT_RADIUS_DEN: i32 = 5;

/// Nominal time between orbit steps (ms)
pub const ORBIT_STEP_PERIOD_MS: u16 = 100;

/// Fixed dwell at each orbit point (ms)
pub const ORBIT_DWELL_MS: u16 = 20;

/// Elliptical sweep state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrbitStrategy {
    /// Current binary-angle phase, `0..PHASE_PER_TURN`
    phase: u16,
}

impl OrbitStrategy {
    pub const fn new() -> Self {
        Self { phase: 0 }
    }

    /// Current phase
    pub fn phase(&self) -> u16 {
        self.phase
    }

    /// Radii of the ellipse for a safe range
    pub fn radii(range: &SafeRange) -> (i32, i32) {
        let radius = |span: i16| span as i32 * ORBIT_RADIUS_NUM / (2 * ORBIT_RADIUS_DEN);
        (radius(range.pan.span()), radius(range.tilt.span()))
    }

    /// Phase increment and implied speed for a speed limit
    ///
    /// The increment is reduced until the implied speed fits, down to one
    /// unit per step. The returned speed never exceeds `max_speed`.
    pub fn increment_for(radius_max: i32, max_speed: f32) -> (u16, f32) {
        let implied = |increment: u16| {
            let arc_deg = radius_max as f32 * TAU * increment as f32 / PHASE_PER_TURN as f32;
            arc_deg * 1000.0 / ORBIT_STEP_PERIOD_MS as f32
        };

        let mut increment = ORBIT_PHASE_INCREMENT;
        let base_speed = implied(increment);
        if base_speed > max_speed && base_speed > 0.0 {
            let scaled = ORBIT_PHASE_INCREMENT as f32 * max_speed / base_speed;
            increment = (scaled as u16).clamp(1, ORBIT_PHASE_INCREMENT);
        }

        let speed = implied(increment);
        if speed <= 0.0 {
            (increment, max_speed)
        } else {
            (increment, speed.min(max_speed))
        }
    }
}

impl MotionStrategy for OrbitStrategy {
    fn mode(&self) -> MotionMode {
        MotionMode::Orbit
    }

    fn reset(&mut self) {
        self.phase = 0;
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> RawStep {
        let center = ctx.range.center();
        let (radius_pan, radius_tilt) = Self::radii(ctx.range);
        let (increment, speed) =
            Self::increment_for(radius_pan.max(radius_tilt), ctx.params.speed_deg_per_sec);

        let pan = center.pan as i32 + mul_q15(radius_pan, cos_q15(self.phase));
        let tilt = center.tilt as i32 + mul_q15(radius_tilt, sin_q15(self.phase));

        self.phase = (self.phase + increment) % PHASE_PER_TURN;

        RawStep {
            target: Angles::new(pan as i16, tilt as i16),
            speed_deg_per_sec: speed,
            dwell_ms: ORBIT_DWELL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EffectiveParams};
    use crate::traits::NoTargeting;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn run_steps(strategy: &mut OrbitStrategy, params: &EffectiveParams, n: usize) -> [RawStep; 128] {
        let range = SafeRange::from_config(&Config::default());
        let mut rng = SmallRng::seed_from_u64(1);
        let mut targeting = NoTargeting;
        let mut out = [RawStep {
            target: Angles::default(),
            speed_deg_per_sec: 0.0,
            dwell_ms: 0,
        }; 128];
        for slot in out.iter_mut().take(n) {
            let mut ctx = StepContext {
                params,
                range: &range,
                current: Angles::default(),
                rng: &mut rng,
                targeting: &mut targeting,
            };
            *slot = strategy.step(&mut ctx);
        }
        out
    }

    #[test]
    fn test_starts_at_phase_zero() {
        // Pan range 41..139 (span 98), tilt 51..129 (span 78)
        let params = EffectiveParams::from_config(&Config::default());
        let mut strategy = OrbitStrategy::new();
        let steps = run_steps(&mut strategy, &params, 1);

        // radius_pan = 98 * 4 / 10 = 39
        assert_eq!(steps[0].target, Angles::new(90 + 39, 90));
        assert_eq!(steps[0].dwell_ms, ORBIT_DWELL_MS);
    }

    #[test]
    fn test_stays_off_the_margin() {
        let config = Config::default();
        let range = SafeRange::from_config(&config);
        let params = EffectiveParams::from_config(&config);
        let mut strategy = OrbitStrategy::new();

        for step in run_steps(&mut strategy, &params, 128).iter() {
            assert!(step.target.pan > range.pan.lo && step.target.pan < range.pan.hi);
            assert!(step.target.tilt > range.tilt.lo && step.target.tilt < range.tilt.hi);
        }
    }

    #[test]
    fn test_periodic_and_restartable() {
        let mut params = EffectiveParams::from_config(&Config::default());
        params.speed_deg_per_sec = 1000.0;
        let mut strategy = OrbitStrategy::new();

        // 64 steps per revolution at the uncapped increment
        let steps = run_steps(&mut strategy, &params, 128);
        assert_eq!(strategy.phase(), 0);
        for i in 0..64 {
            assert_eq!(steps[i].target, steps[i + 64].target);
        }

        strategy.reset();
        let again = run_steps(&mut strategy, &params, 1);
        assert_eq!(again[0].target, steps[0].target);
    }

    #[test]
    fn test_speed_caps_increment() {
        // radius 39: base implied speed = 39 * 2pi / 64 * 10 ≈ 38.3 deg/s
        let (increment, speed) = OrbitStrategy::increment_for(39, 1000.0);
        assert_eq!(increment, ORBIT_PHASE_INCREMENT);
        assert!(speed > 38.0 && speed < 39.0);

        let (increment, speed) = OrbitStrategy::increment_for(39, 19.0);
        assert!(increment < ORBIT_PHASE_INCREMENT);
        assert!(increment >= 1);
        assert!(speed <= 19.0);

        // Even one unit per step is too fast: speed is still bounded
        let (increment, speed) = OrbitStrategy::increment_for(39, 0.1);
        assert_eq!(increment, 1);
        assert!(speed <= 0.1);
    }

    #[test]
    fn test_speed_never_exceeds_params() {
        let mut params = EffectiveParams::from_config(&Config::default());
        params.speed_deg_per_sec = 12.5;
        let mut strategy = OrbitStrategy::new();
        for step in run_steps(&mut strategy, &params, 32).iter().take(32) {
            assert!(step.speed_deg_per_sec <= 12.5);
        }
    }
}
