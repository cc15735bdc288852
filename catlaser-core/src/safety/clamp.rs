//! Safety clamp
//!
//! Pure min/max clipping into `[min + margin, max - margin]` on each axis.
//! No remapping or scaling: an in-range angle passes through untouched.
//!
//! The range is non-empty for any config that passed
//! [`Config::validate`](crate::config::Config::validate).

use crate::config::Config;

/// A pan/tilt angle pair in whole degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Angles {
    pub pan: i16,
    pub tilt: i16,
}

impl Angles {
    pub const fn new(pan: i16, tilt: i16) -> Self {
        Self { pan, tilt }
    }
}

/// Inclusive safe interval on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisRange {
    pub lo: i16,
    pub hi: i16,
}

impl AxisRange {
    /// Clip a value into the interval
    pub fn clamp(&self, value: i16) -> i16 {
        value.max(self.lo).min(self.hi)
    }

    /// Check membership (inclusive)
    pub fn contains(&self, value: i16) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Width in degrees (`hi - lo`)
    pub fn span(&self) -> i16 {
        self.hi - self.lo
    }

    /// Integer midpoint
    pub fn center(&self) -> i16 {
        ((self.lo as i32 + self.hi as i32) / 2) as i16
    }
}

/// Safe ranges for both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SafeRange {
    pub pan: AxisRange,
    pub tilt: AxisRange,
}

impl SafeRange {
    /// Derive the safe ranges from a config
    pub fn from_config(config: &Config) -> Self {
        let margin = config.edge_margin_deg;
        Self {
            pan: AxisRange {
                lo: config.pan_min.saturating_add(margin),
                hi: config.pan_max.saturating_sub(margin),
            },
            tilt: AxisRange {
                lo: config.tilt_min.saturating_add(margin),
                hi: config.tilt_max.saturating_sub(margin),
            },
        }
    }

    /// Clip both axes
    pub fn clamp(&self, angles: Angles) -> Angles {
        Angles {
            pan: self.pan.clamp(angles.pan),
            tilt: self.tilt.clamp(angles.tilt),
        }
    }

    /// Check that both axes are inside their range
    pub fn contains(&self, angles: Angles) -> bool {
        self.pan.contains(angles.pan) && self.tilt.contains(angles.tilt)
    }

    /// Centre of the safe area
    pub fn center(&self) -> Angles {
        Angles {
            pan: self.pan.center(),
            tilt: self.tilt.center(),
        }
    }
}

/// Clamp `(pan, tilt)` into the config's safe range
pub fn clamp(pan: i16, tilt: i16, config: &Config) -> Angles {
    SafeRange::from_config(config).clamp(Angles::new(pan, tilt))
}
