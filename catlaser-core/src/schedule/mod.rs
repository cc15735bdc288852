//! Schedule resolution
//!
//! Decides, from the weekday and the minute of the day, whether the device
//! may run right now and with which parameters.

pub mod resolver;

pub use resolver::{resolve, ScheduleDecision};
