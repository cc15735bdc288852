//! GPIO laser output
//!
//! Drives the laser diode enable line (directly or via a transistor).

use catlaser_core::traits::{LaserError, LaserOutput};
use embedded_hal::digital::OutputPin;

/// GPIO laser output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioLaser<P> {
    pin: P,
    /// If true, laser ON = pin LOW
    inverted: bool,
    /// Last successfully written state
    on: bool,
}

impl<P: OutputPin> GpioLaser<P> {
    /// Create a new laser output and drive it off
    ///
    /// Fails if the initial off write fails, since the line state is then
    /// unknown.
    pub fn new(pin: P, inverted: bool) -> Result<Self, LaserError> {
        let mut laser = Self {
            pin,
            inverted,
            // Unknown until the first write lands
            on: true,
        };
        laser.set_on(false)?;
        Ok(laser)
    }

    pub fn new_active_high(pin: P) -> Result<Self, LaserError> {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Result<Self, LaserError> {
        Self::new(pin, true)
    }

    /// Release the pin as-is; switch the laser off first
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LaserOutput for GpioLaser<P> {
    fn set_on(&mut self, on: bool) -> Result<(), LaserError> {
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        match result {
            Ok(()) => {
                self.on = on;
                Ok(())
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Laser pin write failed (on={})", on);
                Err(LaserError::Hardware)
            }
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }
    }

    /// Pin whose writes always fail
    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_high(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }

        fn set_low(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }
    }

    /// Pin that can be raised but never lowered
    struct StuckHighPin {
        high: bool,
    }

    impl ErrorType for StuckHighPin {
        type Error = ErrorKind;
    }

    impl OutputPin for StuckHighPin {
        fn set_high(&mut self) -> Result<(), ErrorKind> {
            self.high = true;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_active_high_laser() {
        let mut laser = GpioLaser::new_active_high(MockPin::new()).unwrap();
        assert!(!laser.is_on());
        assert!(!laser.pin.high);

        laser.set_on(true).unwrap();
        assert!(laser.is_on());
        assert!(laser.pin.high);

        laser.set_on(false).unwrap();
        assert!(!laser.is_on());
        assert!(!laser.pin.high);
    }

    #[test]
    fn test_active_low_laser() {
        let mut laser = GpioLaser::new_active_low(MockPin::new()).unwrap();
        // Off means pin high
        assert!(!laser.is_on());
        assert!(laser.pin.high);

        laser.set_on(true).unwrap();
        assert!(laser.is_on());
        assert!(!laser.pin.high);

        laser.set_on(false).unwrap();
        let pin = laser.free();
        assert!(pin.high);
    }

    #[test]
    fn test_broken_pin_fails_construction() {
        assert_eq!(
            GpioLaser::new_active_high(BrokenPin).err(),
            Some(LaserError::Hardware)
        );
    }

    #[test]
    fn test_failed_off_keeps_reporting_on() {
        // Active-high construction writes low first, which this pin refuses
        assert!(GpioLaser::new_active_high(StuckHighPin { high: false }).is_err());

        let mut laser = GpioLaser {
            pin: StuckHighPin { high: false },
            inverted: false,
            on: false,
        };
        laser.set_on(true).unwrap();
        assert!(laser.is_on());

        assert_eq!(laser.set_on(false), Err(LaserError::Hardware));
        assert!(laser.is_on());
        assert!(laser.pin.high);
    }
}
