//! Pan/tilt actuator trait

use core::fmt;

use crate::motion::MotionCommand;

/// Errors reported by an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Target angle cannot be expressed by the output stage
    OutOfRange,
    /// Output stage rejected the update (PWM or bus error)
    Hardware,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorError::OutOfRange => f.write_str("target outside actuator range"),
            ActuatorError::Hardware => f.write_str("actuator hardware error"),
        }
    }
}

/// Two-axis pointing mechanism
///
/// Implementations move towards the commanded target at the commanded
/// speed. The core only ever hands over clamped targets.
pub trait Actuator {
    /// Start moving towards a new target
    fn move_to(&mut self, command: &MotionCommand) -> Result<(), ActuatorError>;

    /// Check if the last commanded target has been reached
    fn is_at_target(&self) -> bool;
}
