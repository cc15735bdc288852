//! Session state machine
//!
//! ```text
//!          schedule active                   elapsed >= session_max_min
//!   Idle ──────────────────▶ Active ─────────────────────────────────▶ Cooldown
//!    ▲                         │                                          │
//!    │    schedule inactive    │                                          │
//!    ├─────────────────────────┘                                          │
//!    │               elapsed >= cooldown_min (regardless of schedule)     │
//!    └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `session_max_min == 0` disables the Active → Cooldown edge. The guard is
//! the only writer of [`RuntimeSession`].

use super::decision::RunDecision;
use crate::config::Config;
use crate::schedule::ScheduleDecision;

/// Milliseconds per minute
pub const MS_PER_MINUTE: u64 = 60_000;

/// Upper bound on chained transitions in one tick
///
/// Entering Cooldown ends the chain, so Cooldown → Idle → Active is the
/// longest possible one.
const MAX_TRANSITIONS_PER_TICK: usize = 2;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Not running; initial state
    #[default]
    Idle,
    /// Running inside a schedule window
    Active,
    /// Mandatory pause after a capped session
    Cooldown,
}

impl SessionState {
    /// Wire value
    pub const fn to_byte(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Active => 1,
            SessionState::Cooldown => 2,
        }
    }

    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(SessionState::Idle),
            1 => Some(SessionState::Active),
            2 => Some(SessionState::Cooldown),
            _ => None,
        }
    }
}

/// Volatile session bookkeeping; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RuntimeSession {
    /// Current state
    pub state: SessionState,
    /// Monotonic time the current Active session began
    pub active_since_ms: Option<u64>,
    /// Monotonic time the current cooldown ends
    pub cooldown_until_ms: Option<u64>,
}

/// Session cap and cooldown enforcement
#[derive(Debug, Clone, Default)]
pub struct SessionGuard {
    session: RuntimeSession,
}

impl SessionGuard {
    /// Create a guard in `Idle`
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    /// Full session record
    pub fn session(&self) -> &RuntimeSession {
        &self.session
    }

    /// Time spent in the current Active session
    pub fn active_elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.session
            .active_since_ms
            .map(|since| now_ms.saturating_sub(since))
    }

    /// Time left until the cooldown ends
    pub fn cooldown_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.session
            .cooldown_until_ms
            .map(|until| until.saturating_sub(now_ms))
    }

    /// Advance the state machine and produce the run decision
    ///
    /// `now_ms` is a monotonic timestamp supplied by the caller.
    pub fn tick(
        &mut self,
        schedule: &ScheduleDecision,
        now_ms: u64,
        config: &Config,
    ) -> RunDecision {
        for _ in 0..MAX_TRANSITIONS_PER_TICK {
            let next = self.next_state(schedule.active, now_ms, config);
            if next == self.session.state {
                break;
            }
            self.enter(next, now_ms, config);
            // A capped session yields at least one non-running tick
            if next == SessionState::Cooldown {
                break;
            }
        }

        match self.session.state {
            SessionState::Active => RunDecision::Run(schedule.params),
            SessionState::Cooldown if schedule.active => RunDecision::Pause,
            SessionState::Idle | SessionState::Cooldown => RunDecision::Park,
        }
    }

    /// Pure transition function for the current state
    fn next_state(&self, schedule_active: bool, now_ms: u64, config: &Config) -> SessionState {
        match self.session.state {
            SessionState::Idle => {
                if schedule_active {
                    SessionState::Active
                } else {
                    SessionState::Idle
                }
            }
            SessionState::Active => {
                let cap_ms = config.session_max_min as u64 * MS_PER_MINUTE;
                let elapsed = self.active_elapsed_ms(now_ms).unwrap_or(0);
                // The cap wins over a schedule ending on the same tick
                if config.session_max_min > 0 && elapsed >= cap_ms {
                    SessionState::Cooldown
                } else if !schedule_active {
                    SessionState::Idle
                } else {
                    SessionState::Active
                }
            }
            SessionState::Cooldown => match self.session.cooldown_until_ms {
                Some(until) if now_ms < until => SessionState::Cooldown,
                _ => SessionState::Idle,
            },
        }
    }

    fn enter(&mut self, next: SessionState, now_ms: u64, config: &Config) {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "session: {} -> {} at {} ms",
            self.session.state,
            next,
            now_ms
        );

        self.session = match next {
            SessionState::Idle => RuntimeSession::default(),
            SessionState::Active => RuntimeSession {
                state: SessionState::Active,
                active_since_ms: Some(now_ms),
                cooldown_until_ms: None,
            },
            SessionState::Cooldown => RuntimeSession {
                state: SessionState::Cooldown,
                active_since_ms: None,
                cooldown_until_ms: Some(
                    now_ms.saturating_add(config.cooldown_min as u64 * MS_PER_MINUTE),
                ),
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EffectiveParams;
    use crate::session::DecisionKind;
    use proptest::prelude::*;

    fn schedule(active: bool, config: &Config) -> ScheduleDecision {
        ScheduleDecision {
            active,
            params: EffectiveParams::from_config(config),
            window: None,
        }
    }

    fn minutes(m: u64) -> u64 {
        m * MS_PER_MINUTE
    }

    #[test]
    fn test_idle_parks_without_schedule() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        let decision = guard.tick(&schedule(false, &config), 0, &config);
        assert_eq!(decision, RunDecision::Park);
        assert_eq!(guard.state(), SessionState::Idle);
    }

    #[test]
    fn test_schedule_starts_session() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        let active = schedule(true, &config);

        let decision = guard.tick(&active, 1000, &config);
        assert_eq!(decision, RunDecision::Run(active.params));
        assert_eq!(guard.state(), SessionState::Active);
        assert_eq!(guard.session().active_since_ms, Some(1000));
    }

    #[test]
    fn test_schedule_end_returns_to_idle() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        guard.tick(&schedule(true, &config), 0, &config);

        let decision = guard.tick(&schedule(false, &config), minutes(3), &config);
        assert_eq!(decision, RunDecision::Park);
        assert_eq!(guard.state(), SessionState::Idle);
        assert_eq!(guard.active_elapsed_ms(minutes(3)), None);
    }

    #[test]
    fn test_cap_enters_cooldown_and_pauses() {
        let config = Config {
            session_max_min: 10,
            cooldown_min: 2,
            ..Config::default()
        };
        let mut guard = SessionGuard::new();
        let active = schedule(true, &config);

        guard.tick(&active, 0, &config);
        assert!(guard.tick(&active, minutes(10) - 1, &config).is_run());

        let decision = guard.tick(&active, minutes(10), &config);
        assert_eq!(decision, RunDecision::Pause);
        assert_eq!(guard.state(), SessionState::Cooldown);
        assert_eq!(guard.cooldown_remaining_ms(minutes(11)), Some(minutes(1)));
    }

    #[test]
    fn test_cooldown_parks_when_schedule_ends() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        guard.tick(&schedule(true, &config), 0, &config);
        guard.tick(&schedule(true, &config), minutes(10), &config);
        assert_eq!(guard.state(), SessionState::Cooldown);

        let decision = guard.tick(&schedule(false, &config), minutes(11), &config);
        assert_eq!(decision, RunDecision::Park);
        assert_eq!(guard.state(), SessionState::Cooldown);
    }

    #[test]
    fn test_cooldown_not_interrupted_by_schedule() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        guard.tick(&schedule(true, &config), 0, &config);
        guard.tick(&schedule(true, &config), minutes(10), &config);

        // Schedule flaps off and on during cooldown
        guard.tick(&schedule(false, &config), minutes(10) + 500, &config);
        let decision = guard.tick(&schedule(true, &config), minutes(11), &config);
        assert_eq!(decision.kind(), DecisionKind::Pause);
        assert_eq!(guard.state(), SessionState::Cooldown);
    }

    #[test]
    fn test_cooldown_expiry_resumes_same_tick() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        let active = schedule(true, &config);
        guard.tick(&active, 0, &config);
        guard.tick(&active, minutes(10), &config);

        let decision = guard.tick(&active, minutes(12), &config);
        assert!(decision.is_run());
        assert_eq!(guard.session().active_since_ms, Some(minutes(12)));
    }

    #[test]
    fn test_cooldown_expiry_without_schedule_goes_idle() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        guard.tick(&schedule(true, &config), 0, &config);
        guard.tick(&schedule(true, &config), minutes(10), &config);

        let decision = guard.tick(&schedule(false, &config), minutes(12), &config);
        assert_eq!(decision, RunDecision::Park);
        assert_eq!(guard.state(), SessionState::Idle);
    }

    #[test]
    fn test_unlimited_session() {
        let config = Config {
            session_max_min: 0,
            ..Config::default()
        };
        let mut guard = SessionGuard::new();
        let active = schedule(true, &config);

        for hour in 0..48 {
            assert!(guard.tick(&active, minutes(hour * 60), &config).is_run());
        }
        assert_eq!(guard.state(), SessionState::Active);
    }

    #[test]
    fn test_cap_wins_over_schedule_end() {
        let config = Config::default();
        let mut guard = SessionGuard::new();
        guard.tick(&schedule(true, &config), 0, &config);

        let decision = guard.tick(&schedule(false, &config), minutes(10), &config);
        assert_eq!(decision, RunDecision::Park);
        assert_eq!(guard.state(), SessionState::Cooldown);
    }

    #[test]
    fn test_zero_cooldown_still_breaks_the_run() {
        // Rejected by validation, but the guard must hold the cap on its own
        let config = Config {
            session_max_min: 1,
            cooldown_min: 0,
            ..Config::default()
        };
        let mut guard = SessionGuard::new();
        let active = schedule(true, &config);
        guard.tick(&active, 0, &config);

        assert_eq!(guard.tick(&active, minutes(1), &config), RunDecision::Pause);
        assert_eq!(guard.state(), SessionState::Cooldown);

        assert!(guard.tick(&active, minutes(1) + 10_000, &config).is_run());
        assert_eq!(
            guard.session().active_since_ms,
            Some(minutes(1) + 10_000)
        );
    }

    #[test]
    fn test_state_bytes() {
        for state in [
            SessionState::Idle,
            SessionState::Active,
            SessionState::Cooldown,
        ] {
            assert_eq!(SessionState::from_byte(state.to_byte()), Some(state));
        }
    }

    proptest! {
        #[test]
        fn prop_run_streak_bounded_and_cooldown_respected(
            session_max_min in 1u16..30,
            cooldown_min in 0u16..15,
            step_s in 1u64..90,
        ) {
            let config = Config {
                session_max_min,
                cooldown_min,
                ..Config::default()
            };
            let active = schedule(true, &config);
            let mut guard = SessionGuard::new();

            let cap_ms = session_max_min as u64 * MS_PER_MINUTE;
            let cooldown_ms = cooldown_min as u64 * MS_PER_MINUTE;
            let mut streak_start: Option<u64> = None;
            let mut last_run_end: Option<u64> = None;

            let mut now = 0;
            while now < 4 * 60 * MS_PER_MINUTE {
                let running = guard.tick(&active, now, &config).is_run();
                if running {
                    if streak_start.is_none() {
                        if let Some(end) = last_run_end {
                            prop_assert!(now - end >= cooldown_ms);
                        }
                        streak_start = Some(now);
                    }
                    let start = streak_start.unwrap_or(now);
                    prop_assert!(now - start < cap_ms);
                } else if streak_start.take().is_some() {
                    last_run_end = Some(now);
                }
                now += step_s * 1000;
            }
        }
    }
}
