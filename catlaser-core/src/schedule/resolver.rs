//! Weekly schedule resolver
//!
//! A pure function of (weekday, minute of day, config). No clock access,
//! no state: the same inputs always give the same decision.

use crate::config::{Config, EffectiveParams, Weekday, WindowSlot};

/// Outcome of resolving the schedule for one instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleDecision {
    /// The device may run now
    pub active: bool,
    /// Parameters to use; the config's top-level values when inactive
    pub params: EffectiveParams,
    /// Window that matched, if any
    pub window: Option<WindowSlot>,
}

impl ScheduleDecision {
    /// Inactive decision carrying the config defaults (used for parking)
    pub fn inactive(config: &Config) -> Self {
        Self {
            active: false,
            params: EffectiveParams::from_config(config),
            window: None,
        }
    }
}

/// Resolve the schedule for one instant
///
/// Window `a` is checked before `b`, so `a` wins when both match the same
/// minute. Overlapping windows are not an error.
pub fn resolve(weekday: Weekday, minute_of_day: u16, config: &Config) -> ScheduleDecision {
    let day = config.day(weekday);
    if !config.run_enabled || !day.day_enabled {
        return ScheduleDecision::inactive(config);
    }

    [WindowSlot::A, WindowSlot::B]
        .into_iter()
        .find(|slot| day.window(*slot).contains(minute_of_day))
        .map(|slot| ScheduleDecision {
            active: true,
            params: EffectiveParams::for_preset(day.window(slot).preset, config),
            window: Some(slot),
        })
        .unwrap_or_else(|| ScheduleDecision::inactive(config))
}
