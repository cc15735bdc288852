//! Configuration type definitions
//!
//! These types represent the persisted device configuration. The wire and
//! storage format is the postcard snapshot in [`super::snapshot`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minutes in one day; valid minute-of-day values are `0..MINUTES_PER_DAY`
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Number of entries in the weekly day table
pub const DAYS_PER_WEEK: usize = 7;

/// Motion strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionMode {
    /// Independent uniform draws over the safe range
    #[default]
    Random,
    /// Continuous elliptical sweep around the range centre
    Orbit,
    /// Raster sweep, row by row
    Scan,
    /// Externally targeted, falls back to Random
    Smart,
}

impl MotionMode {
    /// All modes in id order
    pub const ALL: [MotionMode; 4] = [
        MotionMode::Random,
        MotionMode::Orbit,
        MotionMode::Scan,
        MotionMode::Smart,
    ];

    /// Stable numeric id
    pub const fn id(self) -> u8 {
        match self {
            MotionMode::Random => 0,
            MotionMode::Orbit => 1,
            MotionMode::Scan => 2,
            MotionMode::Smart => 3,
        }
    }

    /// Look up a mode by its numeric id
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    /// Lowercase display name
    pub const fn name(self) -> &'static str {
        match self {
            MotionMode::Random => "random",
            MotionMode::Orbit => "orbit",
            MotionMode::Scan => "scan",
            MotionMode::Smart => "smart",
        }
    }
}

/// Named parameter bundle selected by a time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PresetId {
    /// Use the top-level config values unmodified
    #[default]
    Custom,
    Soft,
    Normal,
    Wild,
    Smart,
}

impl PresetId {
    /// All presets in id order
    pub const ALL: [PresetId; 5] = [
        PresetId::Custom,
        PresetId::Soft,
        PresetId::Normal,
        PresetId::Wild,
        PresetId::Smart,
    ];

    /// Stable numeric id
    pub const fn id(self) -> u8 {
        match self {
            PresetId::Custom => 0,
            PresetId::Soft => 1,
            PresetId::Normal => 2,
            PresetId::Wild => 3,
            PresetId::Smart => 4,
        }
    }

    /// Look up a preset by numeric id
    ///
    /// Unknown ids resolve to `Custom`, matching the name lookup.
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == id)
            .unwrap_or(PresetId::Custom)
    }

    /// Lowercase display name
    pub const fn name(self) -> &'static str {
        match self {
            PresetId::Soft => "soft",
            PresetId::Normal => "normal",
            PresetId::Wild => "wild",
            PresetId::Smart => "smart",
            PresetId::Custom => "custom",
        }
    }

    /// Parse a preset name; accepts the names returned by [`PresetId::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Day of week
///
/// Indexed 0 = Sunday through 6 = Saturday. This is the index into
/// [`Config::days`] and the value the clock collaborator must supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All weekdays in table order
    pub const ALL: [Weekday; DAYS_PER_WEEK] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Index into the day table (0 = Sunday)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Build from a table index; `None` for values above 6
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// One schedule window within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimeWindow {
    /// Start, minutes since midnight (inclusive)
    pub start_min: u16,
    /// Stop, minutes since midnight (exclusive). Below `start_min` the
    /// window wraps past midnight.
    pub stop_min: u16,
    /// Gates this window
    pub enabled: bool,
    /// Parameter bundle applied while the window is active
    pub preset: PresetId,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start_min: 18 * 60,
            stop_min: 20 * 60,
            enabled: false,
            preset: PresetId::Custom,
        }
    }
}

impl TimeWindow {
    /// Create an enabled window
    pub const fn new(start_min: u16, stop_min: u16, preset: PresetId) -> Self {
        Self {
            start_min,
            stop_min,
            enabled: true,
            preset,
        }
    }

    /// Check whether `minute_of_day` falls inside this window
    ///
    /// Disabled windows, empty windows (`start == stop`) and minutes outside
    /// the day never match.
    pub fn contains(&self, minute_of_day: u16) -> bool {
        if !self.enabled || minute_of_day >= MINUTES_PER_DAY {
            return false;
        }

        if self.start_min <= self.stop_min {
            self.start_min <= minute_of_day && minute_of_day < self.stop_min
        } else {
            // Wraps past midnight
            minute_of_day >= self.start_min || minute_of_day < self.stop_min
        }
    }
}

/// Which of the two window slots of a day matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowSlot {
    A,
    B,
}

/// Schedule for a single weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DaySchedule {
    /// First window; wins when both match
    pub a: TimeWindow,
    /// Second window
    pub b: TimeWindow,
    /// Gates both windows
    pub day_enabled: bool,
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            a: TimeWindow::default(),
            b: TimeWindow::default(),
            day_enabled: true,
        }
    }
}

impl DaySchedule {
    /// Get a window by slot
    pub fn window(&self, slot: WindowSlot) -> &TimeWindow {
        match slot {
            WindowSlot::A => &self.a,
            WindowSlot::B => &self.b,
        }
    }
}

/// Complete device configuration
///
/// Read-only to the core. Updates replace the whole value between ticks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Pan mechanical lower bound (degrees)
    pub pan_min: i16,
    /// Pan mechanical upper bound (degrees)
    pub pan_max: i16,
    /// Tilt mechanical lower bound (degrees)
    pub tilt_min: i16,
    /// Tilt mechanical upper bound (degrees)
    pub tilt_max: i16,
    /// Degrees kept clear of every mechanical bound
    pub edge_margin_deg: i16,
    /// Park pan angle (degrees)
    pub park_pan: i16,
    /// Park tilt angle (degrees)
    pub park_tilt: i16,
    /// Nominal transition speed
    pub speed_deg_per_sec: f32,
    /// Shortest dwell at a target (ms)
    pub dwell_ms_min: u16,
    /// Longest dwell at a target (ms)
    pub dwell_ms_max: u16,
    /// Motion mode used by `Custom` windows
    pub mode: MotionMode,
    /// Master laser switch
    pub laser_enabled: bool,
    /// Master run switch
    pub run_enabled: bool,
    /// Session cap in minutes (0 = unlimited)
    pub session_max_min: u16,
    /// Mandatory pause after a capped session (minutes)
    pub cooldown_min: u16,
    /// Day table, indexed by [`Weekday::index`]
    pub days: [DaySchedule; DAYS_PER_WEEK],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pan_min: 35,
            pan_max: 145,
            tilt_min: 45,
            tilt_max: 135,
            edge_margin_deg: 6,
            park_pan: 90,
            park_tilt: 90,
            speed_deg_per_sec: 70.0,
            dwell_ms_min: 150,
            dwell_ms_max: 900,
            mode: MotionMode::Random,
            laser_enabled: true,
            run_enabled: false,
            session_max_min: 10,
            cooldown_min: 2,
            days: [DaySchedule::default(); DAYS_PER_WEEK],
        }
    }
}

impl Config {
    /// Create the factory default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the schedule for a weekday
    pub fn day(&self, weekday: Weekday) -> &DaySchedule {
        &self.days[weekday.index()]
    }

    /// Get the schedule for a weekday, mutably
    pub fn day_mut(&mut self, weekday: Weekday) -> &mut DaySchedule {
        &mut self.days[weekday.index()]
    }
}
