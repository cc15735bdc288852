//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod clock;
pub mod laser;
pub mod targeting;

pub use actuator::{Actuator, ActuatorError};
pub use clock::{Clock, ClockReading};
pub use laser::{LaserError, LaserOutput};
pub use targeting::{NoTargeting, TargetingProvider};
