//! Wall clock and monotonic time source

use crate::config::Weekday;

/// One clock sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockReading {
    /// Local day of week
    pub weekday: Weekday,
    /// Local minute of day, `0..1440`
    pub minute_of_day: u16,
    /// Monotonic milliseconds, never goes backwards
    pub now_ms: u64,
}

/// Time source
pub trait Clock {
    /// Current time, or `None` while the wall clock is not yet known
    ///
    /// Without a reading the core does not tick.
    fn now(&mut self) -> Option<ClockReading>;
}
