//! Laser output trait

use core::fmt;

/// Errors reported by a laser output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaserError {
    /// The enable line could not be driven; the emitter state is unknown
    Hardware,
}

impl fmt::Display for LaserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaserError::Hardware => f.write_str("laser output write failed"),
        }
    }
}

/// On/off laser emitter
///
/// Implementations control the diode via GPIO or a driver enable line.
pub trait LaserOutput {
    /// Turn the laser on or off
    ///
    /// On error the reported state is left unchanged.
    fn set_on(&mut self, on: bool) -> Result<(), LaserError>;

    /// Check if the laser is currently on
    fn is_on(&self) -> bool;
}
