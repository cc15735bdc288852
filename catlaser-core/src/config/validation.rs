//! Load-time configuration checks
//!
//! A config that fails here must never reach the core. The clamp and the
//! motion strategies rely on a non-empty safe range for both axes.

use core::fmt;

use super::types::{Config, WindowSlot, MINUTES_PER_DAY};

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `pan_min >= pan_max`
    PanBoundsInverted,
    /// `tilt_min >= tilt_max`
    TiltBoundsInverted,
    /// `edge_margin_deg < 0`
    NegativeMargin,
    /// Margin leaves no pan range
    PanMarginTooLarge,
    /// Margin leaves no tilt range
    TiltMarginTooLarge,
    /// Speed is zero, negative or not a number
    NonPositiveSpeed,
    /// `dwell_ms_min > dwell_ms_max`
    DwellInverted,
    /// A capped session needs a non-zero cooldown
    CooldownRequired,
    /// A window start or stop is not a minute of the day
    WindowOutOfRange { day: u8, slot: WindowSlot },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::PanBoundsInverted => f.write_str("pan bounds inverted"),
            ConfigError::TiltBoundsInverted => f.write_str("tilt bounds inverted"),
            ConfigError::NegativeMargin => f.write_str("edge margin is negative"),
            ConfigError::PanMarginTooLarge => f.write_str("edge margin leaves no pan range"),
            ConfigError::TiltMarginTooLarge => f.write_str("edge margin leaves no tilt range"),
            ConfigError::NonPositiveSpeed => f.write_str("speed must be positive"),
            ConfigError::DwellInverted => f.write_str("dwell minimum exceeds maximum"),
            ConfigError::CooldownRequired => f.write_str("session cap without cooldown"),
            ConfigError::WindowOutOfRange { day, slot } => {
                write!(f, "window {:?} of day {} is outside the day", slot, day)
            }
        }
    }
}

impl Config {
    /// Check every load-time invariant
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pan_min >= self.pan_max {
            return Err(ConfigError::PanBoundsInverted);
        }
        if self.tilt_min >= self.tilt_max {
            return Err(ConfigError::TiltBoundsInverted);
        }
        if self.edge_margin_deg < 0 {
            return Err(ConfigError::NegativeMargin);
        }

        // margin * 2 must stay strictly below the span
        let margin = self.edge_margin_deg as i32;
        if margin * 2 >= self.pan_max as i32 - self.pan_min as i32 {
            return Err(ConfigError::PanMarginTooLarge);
        }
        if margin * 2 >= self.tilt_max as i32 - self.tilt_min as i32 {
            return Err(ConfigError::TiltMarginTooLarge);
        }

        let speed = self.speed_deg_per_sec;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed);
        }
        if self.dwell_ms_min > self.dwell_ms_max {
            return Err(ConfigError::DwellInverted);
        }
        if self.session_max_min > 0 && self.cooldown_min == 0 {
            return Err(ConfigError::CooldownRequired);
        }

        for (day, schedule) in self.days.iter().enumerate() {
            for slot in [WindowSlot::A, WindowSlot::B] {
                let window = schedule.window(slot);
                if window.start_min >= MINUTES_PER_DAY || window.stop_min >= MINUTES_PER_DAY {
                    return Err(ConfigError::WindowOutOfRange {
                        day: day as u8,
                        slot,
                    });
                }
            }
        }

        Ok(())
    }
}
