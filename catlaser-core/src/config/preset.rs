//! Preset parameter table
//!
//! Presets are a closed set: each non-custom preset maps to a fixed
//! (mode, speed, dwell) bundle owned by the firmware, not by the config.

use super::types::{Config, MotionMode, PresetId};

/// Motion parameters in effect for the current instant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EffectiveParams {
    /// Preset the parameters came from
    pub preset: PresetId,
    /// Motion strategy
    pub mode: MotionMode,
    /// Transition speed (deg/s)
    pub speed_deg_per_sec: f32,
    /// Shortest dwell (ms)
    pub dwell_ms_min: u16,
    /// Longest dwell (ms)
    pub dwell_ms_max: u16,
}

impl EffectiveParams {
    /// Top-level config values, unmodified
    pub fn from_config(config: &Config) -> Self {
        Self {
            preset: PresetId::Custom,
            mode: config.mode,
            speed_deg_per_sec: config.speed_deg_per_sec,
            dwell_ms_min: config.dwell_ms_min,
            dwell_ms_max: config.dwell_ms_max,
        }
    }

    /// Resolve a preset against the config
    ///
    /// `Custom` falls through to the config's top-level values.
    pub fn for_preset(preset: PresetId, config: &Config) -> Self {
        match PresetEntry::lookup(preset) {
            Some(entry) => entry.params(preset),
            None => Self::from_config(config),
        }
    }
}

/// One row of the preset table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetEntry {
    pub mode: MotionMode,
    pub speed_deg_per_sec: f32,
    pub dwell_ms_min: u16,
    pub dwell_ms_max: u16,
}

/// Fixed parameters for the non-custom presets, in `PresetId` order
const PRESET_TABLE: [(PresetId, PresetEntry); 4] = [
    (
        PresetId::Soft,
        PresetEntry {
            mode: MotionMode::Orbit,
            speed_deg_per_sec: 35.0,
            dwell_ms_min: 800,
            dwell_ms_max: 2000,
        },
    ),
    (
        PresetId::Normal,
        PresetEntry {
            mode: MotionMode::Random,
            speed_deg_per_sec: 70.0,
            dwell_ms_min: 150,
            dwell_ms_max: 900,
        },
    ),
    (
        PresetId::Wild,
        PresetEntry {
            mode: MotionMode::Random,
            speed_deg_per_sec: 150.0,
            dwell_ms_min: 50,
            dwell_ms_max: 350,
        },
    ),
    (
        PresetId::Smart,
        PresetEntry {
            mode: MotionMode::Smart,
            speed_deg_per_sec: 70.0,
            dwell_ms_min: 150,
            dwell_ms_max: 900,
        },
    ),
];

impl PresetEntry {
    /// Find the table row for a preset; `None` for `Custom`
    pub fn lookup(preset: PresetId) -> Option<Self> {
        PRESET_TABLE
            .iter()
            .find(|(id, _)| *id == preset)
            .map(|(_, entry)| *entry)
    }

    fn params(&self, preset: PresetId) -> EffectiveParams {
        EffectiveParams {
            preset,
            mode: self.mode,
            speed_deg_per_sec: self.speed_deg_per_sec,
            dwell_ms_min: self.dwell_ms_min,
            dwell_ms_max: self.dwell_ms_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_uses_config_values() {
        let mut config = Config::default();
        config.mode = MotionMode::Scan;
        config.speed_deg_per_sec = 42.0;
        config.dwell_ms_min = 10;
        config.dwell_ms_max = 20;

        let params = EffectiveParams::for_preset(PresetId::Custom, &config);
        assert_eq!(params.preset, PresetId::Custom);
        assert_eq!(params.mode, MotionMode::Scan);
        assert_eq!(params.speed_deg_per_sec, 42.0);
        assert_eq!((params.dwell_ms_min, params.dwell_ms_max), (10, 20));
    }

    #[test]
    fn test_named_presets_ignore_config() {
        let mut config = Config::default();
        config.mode = MotionMode::Scan;
        config.speed_deg_per_sec = 5.0;

        let normal = EffectiveParams::for_preset(PresetId::Normal, &config);
        assert_eq!(normal.mode, MotionMode::Random);
        assert_eq!(normal.speed_deg_per_sec, 70.0);

        let soft = EffectiveParams::for_preset(PresetId::Soft, &config);
        assert_eq!(soft.mode, MotionMode::Orbit);

        let smart = EffectiveParams::for_preset(PresetId::Smart, &config);
        assert_eq!(smart.mode, MotionMode::Smart);
    }

    #[test]
    fn test_table_entries_are_well_formed() {
        for preset in PresetId::ALL {
            match PresetEntry::lookup(preset) {
                Some(entry) => {
                    assert!(entry.speed_deg_per_sec > 0.0);
                    assert!(entry.dwell_ms_min <= entry.dwell_ms_max);
                }
                None => assert_eq!(preset, PresetId::Custom),
            }
        }
    }
}
