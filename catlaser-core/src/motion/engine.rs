//! Motion engine
//!
//! Turns a [`RunDecision`] into the next actuator command. On `Run` the
//! strategy for `params.mode` produces a raw step; every raw target goes
//! through the safety clamp before it leaves the engine. On `Park` and
//! `Pause` the target is the clamped park position.

use rand::RngCore;

use super::orbit::OrbitStrategy;
use super::random::RandomStrategy;
use super::scan::{ScanState, ScanStrategy};
use super::smart::SmartStrategy;
use super::strategy::{MotionStrategy, StepContext};
use crate::config::{Config, MotionMode};
use crate::safety::{Angles, SafeRange};
use crate::session::RunDecision;
use crate::traits::TargetingProvider;

/// One actuator command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionCommand {
    /// Clamped target angles
    pub target: Angles,
    /// Transition speed (deg/s)
    pub speed_deg_per_sec: f32,
    /// Time to hold the target before the next step (ms)
    pub dwell_ms: u16,
}

/// Engine-owned motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionState {
    /// Last commanded target
    pub current: Angles,
    /// Mode of the last `Run` step; `None` after parking
    pub mode: Option<MotionMode>,
}

/// Strategy dispatcher and clamp
pub struct MotionEngine<R: RngCore> {
    rng: R,
    state: MotionState,
    random: RandomStrategy,
    orbit: OrbitStrategy,
    scan: ScanStrategy,
    smart: SmartStrategy,
}

impl<R: RngCore> MotionEngine<R> {
    /// Create an engine at a known starting position
    pub fn new(rng: R, start: Angles) -> Self {
        Self {
            rng,
            state: MotionState {
                current: start,
                mode: None,
            },
            random: RandomStrategy::new(),
            orbit: OrbitStrategy::new(),
            scan: ScanStrategy::new(),
            smart: SmartStrategy::new(),
        }
    }

    /// Current motion state
    pub fn state(&self) -> MotionState {
        self.state
    }

    /// SCAN raster position
    pub fn scan_state(&self) -> ScanState {
        self.scan.state()
    }

    /// Resume SCAN from a saved raster position
    pub fn restore_scan(&mut self, state: ScanState) {
        self.scan.restore(state);
    }

    /// SMART steps that fell back to RANDOM since SMART was selected
    pub fn smart_fallback_steps(&self) -> u32 {
        self.smart.fallback_steps()
    }

    /// Compute the next command for a decision
    pub fn next_target(
        &mut self,
        decision: &RunDecision,
        config: &Config,
        targeting: &mut dyn TargetingProvider,
    ) -> MotionCommand {
        let range = SafeRange::from_config(config);

        let params = match decision {
            RunDecision::Run(params) => params,
            RunDecision::Park | RunDecision::Pause => {
                // Strategies restart on the next run
                self.state.mode = None;
                let target = range.clamp(Angles::new(config.park_pan, config.park_tilt));
                self.state.current = target;
                return MotionCommand {
                    target,
                    speed_deg_per_sec: config.speed_deg_per_sec,
                    dwell_ms: 0,
                };
            }
        };

        let Self {
            rng,
            state,
            random,
            orbit,
            scan,
            smart,
        } = self;

        let strategy: &mut dyn MotionStrategy = match params.mode {
            MotionMode::Random => random,
            MotionMode::Orbit => orbit,
            MotionMode::Scan => scan,
            MotionMode::Smart => smart,
        };
        debug_assert_eq!(strategy.mode(), params.mode);

        if state.mode != Some(params.mode) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Motion mode -> {}", strategy.mode().name());
            strategy.reset();
            state.mode = Some(params.mode);
        }

        let raw = strategy.step(&mut StepContext {
            params,
            range: &range,
            current: state.current,
            rng,
            targeting,
        });

        let target = range.clamp(raw.target);
        state.current = target;

        MotionCommand {
            target,
            speed_deg_per_sec: raw.speed_deg_per_sec,
            dwell_ms: raw.dwell_ms,
        }
    }
}
