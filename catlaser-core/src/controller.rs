//! Tick glue
//!
//! One [`Controller::tick`] runs the whole pipeline for one instant:
//!
//! ```text
//! clock ─► resolve ─► SessionGuard ─► MotionEngine ─► clamp ─► command
//!                         │
//!                         └──► laser gate (Run && laser_enabled)
//! ```
//!
//! Config updates are staged with [`Controller::submit_config`] and swapped
//! in whole at the start of the next tick.

use core::fmt;

use rand::RngCore;

use crate::config::{Config, ConfigError};
use crate::motion::{MotionCommand, MotionEngine};
use crate::safety::{Angles, SafeRange};
use crate::schedule;
use crate::session::{DecisionKind, RunDecision, SessionGuard, SessionState};
use crate::traits::{
    Actuator, ActuatorError, Clock, ClockReading, LaserError, LaserOutput, TargetingProvider,
};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Session verdict for this tick
    pub decision: RunDecision,
    /// Laser gate; true only while running with the laser enabled
    pub laser_on: bool,
    /// New actuator command, if one is due
    pub command: Option<MotionCommand>,
}

/// Snapshot of the controller for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerStatus {
    pub session: SessionState,
    /// `None` before the first tick
    pub decision: Option<DecisionKind>,
    /// Last commanded target
    pub target: Angles,
    pub laser_on: bool,
}

/// Step timer for the command in flight
#[derive(Debug, Clone, Copy)]
struct StepTimer {
    kind: DecisionKind,
    dwell_ms: u16,
    /// When the actuator first reported the target reached
    settled_at_ms: Option<u64>,
}

impl StepTimer {
    fn due(&mut self, settled: bool, now_ms: u64) -> bool {
        if !settled {
            self.settled_at_ms = None;
            return false;
        }
        let since = *self.settled_at_ms.get_or_insert(now_ms);
        now_ms.saturating_sub(since) >= self.dwell_ms as u64
    }
}

/// Owns the config and all per-tick state
pub struct Controller<R: RngCore> {
    config: Config,
    pending: Option<Config>,
    guard: SessionGuard,
    engine: MotionEngine<R>,
    step: Option<StepTimer>,
    last_decision: Option<DecisionKind>,
    laser_on: bool,
}

impl<R: RngCore> Controller<R> {
    /// Create a controller; the head is assumed to start at park
    pub fn new(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let start = SafeRange::from_config(&config)
            .clamp(Angles::new(config.park_pan, config.park_tilt));

        Ok(Self {
            config,
            pending: None,
            guard: SessionGuard::new(),
            engine: MotionEngine::new(rng, start),
            step: None,
            last_decision: None,
            laser_on: false,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a config is waiting for the next tick
    pub fn has_pending_config(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate and stage a new config
    ///
    /// A later submission before the next tick replaces an earlier one.
    pub fn submit_config(&mut self, config: Config) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected config: {}", e);
            return Err(e);
        }
        self.pending = Some(config);
        Ok(())
    }

    /// Session guard, for inspection
    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Motion engine, for inspection and SCAN save/restore
    pub fn engine(&mut self) -> &mut MotionEngine<R> {
        &mut self.engine
    }

    /// Run one control step
    ///
    /// `settled` is the actuator's report that the last command's target
    /// has been reached.
    pub fn tick(
        &mut self,
        reading: &ClockReading,
        settled: bool,
        targeting: &mut dyn TargetingProvider,
    ) -> TickOutput {
        if let Some(config) = self.pending.take() {
            #[cfg(feature = "defmt")]
            defmt::info!("Applying new config");
            self.config = config;
            // Re-plan against the new bounds
            self.step = None;
        }

        let schedule = schedule::resolve(reading.weekday, reading.minute_of_day, &self.config);
        let decision = self.guard.tick(&schedule, reading.now_ms, &self.config);
        let kind = decision.kind();

        // Park and Pause hold their target until the decision changes
        let due = match self.step.as_mut() {
            Some(step) if step.kind == kind => {
                kind == DecisionKind::Run && step.due(settled, reading.now_ms)
            }
            _ => true,
        };

        let command = if due {
            let command = self.engine.next_target(&decision, &self.config, targeting);
            self.step = Some(StepTimer {
                kind,
                dwell_ms: command.dwell_ms,
                settled_at_ms: None,
            });
            Some(command)
        } else {
            None
        };

        self.last_decision = Some(kind);
        self.laser_on = decision.is_run() && self.config.laser_enabled;

        TickOutput {
            decision,
            laser_on: self.laser_on,
            command,
        }
    }

    /// Record that the laser was forced off outside a tick
    pub fn force_laser_off(&mut self) {
        self.laser_on = false;
    }

    /// Current status
    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            session: self.guard.state(),
            decision: self.last_decision,
            target: self.engine.state().current,
            laser_on: self.laser_on,
        }
    }
}

/// Collaborator failure during [`drive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// The actuator rejected the command; the laser was switched off
    Actuator(ActuatorError),
    /// The laser output could not be driven
    Laser(LaserError),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::Actuator(e) => write!(f, "actuator: {}", e),
            DriveError::Laser(e) => write!(f, "laser: {}", e),
        }
    }
}

impl From<ActuatorError> for DriveError {
    fn from(e: ActuatorError) -> Self {
        DriveError::Actuator(e)
    }
}

impl From<LaserError> for DriveError {
    fn from(e: LaserError) -> Self {
        DriveError::Laser(e)
    }
}

/// Run one tick against the hardware collaborators
///
/// Returns `Ok(None)` when the clock has no reading and nothing was done.
/// The laser is switched off before any command that is not a run step,
/// and stays off if the actuator rejects the command. A laser write that
/// fails aborts the tick before the actuator is commanded.
pub fn drive<R, C, A, L>(
    controller: &mut Controller<R>,
    clock: &mut C,
    actuator: &mut A,
    laser: &mut L,
    targeting: &mut dyn TargetingProvider,
) -> Result<Option<TickOutput>, DriveError>
where
    R: RngCore,
    C: Clock + ?Sized,
    A: Actuator + ?Sized,
    L: LaserOutput + ?Sized,
{
    let reading = match clock.now() {
        Some(reading) => reading,
        None => return Ok(None),
    };

    let settled = actuator.is_at_target();
    let output = controller.tick(&reading, settled, targeting);

    if !output.laser_on {
        if let Err(e) = laser.set_on(false) {
            #[cfg(feature = "defmt")]
            defmt::error!("Laser off failed: {}", e);
            return Err(e.into());
        }
    }

    if let Some(command) = &output.command {
        if let Err(e) = actuator.move_to(command) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Actuator error: {}, laser off", e);
            controller.force_laser_off();
            laser.set_on(false)?;
            return Err(e.into());
        }
    }

    if output.laser_on {
        if let Err(e) = laser.set_on(true) {
            controller.force_laser_off();
            return Err(e.into());
        }
    }

    Ok(Some(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PresetId, TimeWindow, Weekday};
    use crate::session::MS_PER_MINUTE;
    use crate::traits::NoTargeting;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn monday_config() -> Config {
        let mut config = Config::default();
        config.run_enabled = true;
        config.day_mut(Weekday::Monday).a = TimeWindow::new(1080, 1200, PresetId::Normal);
        config
    }

    fn controller(config: Config) -> Controller<SmallRng> {
        Controller::new(config, SmallRng::seed_from_u64(17)).unwrap()
    }

    fn at(minute: u16, now_ms: u64) -> ClockReading {
        ClockReading {
            weekday: Weekday::Monday,
            minute_of_day: minute,
            now_ms,
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = Config::default();
        config.pan_min = 200;
        assert!(Controller::new(config.clone(), SmallRng::seed_from_u64(1)).is_err());

        let mut ctrl = controller(Config::default());
        assert_eq!(
            ctrl.submit_config(config),
            Err(ConfigError::PanBoundsInverted)
        );
        assert!(!ctrl.has_pending_config());
    }

    #[test]
    fn test_idle_parks_with_laser_off() {
        let mut ctrl = controller(monday_config());
        let out = ctrl.tick(&at(600, 0), true, &mut NoTargeting);
        assert_eq!(out.decision, RunDecision::Park);
        assert!(!out.laser_on);
        assert_eq!(out.command.map(|c| c.target), Some(Angles::new(90, 90)));

        // Holding park issues nothing new
        let out = ctrl.tick(&at(601, 60_000), true, &mut NoTargeting);
        assert_eq!(out.command, None);
    }

    #[test]
    fn test_run_waits_for_settle_and_dwell() {
        let mut ctrl = controller(monday_config());
        let first = ctrl.tick(&at(1100, 0), false, &mut NoTargeting);
        assert!(first.decision.is_run());
        assert!(first.laser_on);
        let dwell = first.command.map(|c| c.dwell_ms as u64).unwrap();

        // Still moving
        assert_eq!(ctrl.tick(&at(1100, 100), false, &mut NoTargeting).command, None);
        // Reached at t=200, dwell starts there
        let settled = ctrl.tick(&at(1100, 200), true, &mut NoTargeting);
        assert_eq!(settled.command.is_some(), dwell == 0);
        if dwell > 0 {
            assert_eq!(
                ctrl.tick(&at(1100, 200 + dwell - 1), true, &mut NoTargeting).command,
                None
            );
            assert!(ctrl
                .tick(&at(1100, 200 + dwell), true, &mut NoTargeting)
                .command
                .is_some());
        }
    }

    #[test]
    fn test_config_swapped_between_ticks() {
        let mut ctrl = controller(monday_config());
        ctrl.tick(&at(1100, 0), true, &mut NoTargeting);

        let mut next = monday_config();
        next.laser_enabled = false;
        ctrl.submit_config(next).unwrap();
        // Not applied until the next tick
        assert!(ctrl.config().laser_enabled);
        assert!(ctrl.status().laser_on);

        let out = ctrl.tick(&at(1100, 10), false, &mut NoTargeting);
        assert!(!ctrl.config().laser_enabled);
        assert!(out.decision.is_run());
        assert!(!out.laser_on);
        // New config forces a fresh command
        assert!(out.command.is_some());
    }

    #[test]
    fn test_cooldown_pauses_with_laser_off() {
        let mut config = monday_config();
        config.session_max_min = 10;
        config.cooldown_min = 2;
        let mut ctrl = controller(config);

        ctrl.tick(&at(1100, 0), true, &mut NoTargeting);
        let out = ctrl.tick(&at(1110, 10 * MS_PER_MINUTE), true, &mut NoTargeting);
        assert_eq!(out.decision, RunDecision::Pause);
        assert!(!out.laser_on);
        assert_eq!(out.command.map(|c| c.target), Some(Angles::new(90, 90)));
        assert_eq!(ctrl.status().session, SessionState::Cooldown);
        assert_eq!(ctrl.status().decision, Some(DecisionKind::Pause));
    }

    struct FixedClock(Option<ClockReading>);

    impl Clock for FixedClock {
        fn now(&mut self) -> Option<ClockReading> {
            self.0
        }
    }

    struct MockActuator {
        fail: bool,
        moves: usize,
    }

    impl Actuator for MockActuator {
        fn move_to(&mut self, _command: &MotionCommand) -> Result<(), ActuatorError> {
            if self.fail {
                return Err(ActuatorError::Hardware);
            }
            self.moves += 1;
            Ok(())
        }

        fn is_at_target(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct MockLaser {
        on: bool,
        /// Off writes fail
        stuck_on: bool,
    }

    impl LaserOutput for MockLaser {
        fn set_on(&mut self, on: bool) -> Result<(), LaserError> {
            if !on && self.stuck_on {
                return Err(LaserError::Hardware);
            }
            self.on = on;
            Ok(())
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    #[test]
    fn test_drive_without_clock_does_nothing() {
        let mut ctrl = controller(monday_config());
        let mut actuator = MockActuator { fail: false, moves: 0 };
        let mut laser = MockLaser::default();
        let result = drive(
            &mut ctrl,
            &mut FixedClock(None),
            &mut actuator,
            &mut laser,
            &mut NoTargeting,
        );
        assert_eq!(result, Ok(None));
        assert_eq!(actuator.moves, 0);
        assert_eq!(ctrl.status().decision, None);
    }

    #[test]
    fn test_drive_gates_laser() {
        let mut ctrl = controller(monday_config());
        let mut actuator = MockActuator { fail: false, moves: 0 };
        let mut laser = MockLaser::default();

        let mut clock = FixedClock(Some(at(1100, 0)));
        drive(&mut ctrl, &mut clock, &mut actuator, &mut laser, &mut NoTargeting).unwrap();
        assert!(laser.is_on());

        let mut clock = FixedClock(Some(at(1250, 1000)));
        let out = drive(&mut ctrl, &mut clock, &mut actuator, &mut laser, &mut NoTargeting)
            .unwrap()
            .unwrap();
        assert_eq!(out.decision, RunDecision::Park);
        assert!(!laser.is_on());
        assert_eq!(actuator.moves, 2);
    }

    #[test]
    fn test_drive_actuator_error_forces_laser_off() {
        let mut ctrl = controller(monday_config());
        let mut actuator = MockActuator { fail: true, moves: 0 };
        let mut laser = MockLaser {
            on: true,
            stuck_on: false,
        };
        let mut clock = FixedClock(Some(at(1100, 0)));

        let result = drive(&mut ctrl, &mut clock, &mut actuator, &mut laser, &mut NoTargeting);
        assert_eq!(result, Err(DriveError::Actuator(ActuatorError::Hardware)));
        assert!(!laser.is_on());
        assert!(!ctrl.status().laser_on);
    }

    #[test]
    fn test_drive_laser_off_failure_aborts_tick() {
        let mut ctrl = controller(monday_config());
        let mut actuator = MockActuator { fail: false, moves: 0 };
        let mut laser = MockLaser {
            on: false,
            stuck_on: true,
        };

        let mut clock = FixedClock(Some(at(1100, 0)));
        drive(&mut ctrl, &mut clock, &mut actuator, &mut laser, &mut NoTargeting).unwrap();
        assert!(laser.is_on());

        // Schedule over: the laser must go off before parking, and cannot
        let mut clock = FixedClock(Some(at(1250, 1000)));
        let result = drive(&mut ctrl, &mut clock, &mut actuator, &mut laser, &mut NoTargeting);
        assert_eq!(result, Err(DriveError::Laser(LaserError::Hardware)));
        assert!(laser.is_on());
        assert_eq!(actuator.moves, 1);
    }
}
