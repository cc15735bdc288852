//! Hobby servo driver with speed-limited slewing
//!
//! A standard servo takes a 500–2500 µs pulse every 20 ms for 0–180°.
//! The driver maps angles to PWM duty and moves the output towards the
//! target at the commanded speed instead of jumping, so the core's speed
//! parameter is honoured even though the servo itself has no speed input.
//!
//! # Usage
//!
//! Call `update()` periodically with the elapsed time. It writes the
//! next slewed position to the PWM channel.
//!
//! ```ignore
//! let mut servos = PanTiltServos::new(pan_pwm, tilt_pwm, ServoConfig::default(), start)?;
//! servos.move_to(&command)?;
//!
//! // In the periodic timer task:
//! servos.update(10)?;
//! ```

use catlaser_core::motion::MotionCommand;
use catlaser_core::safety::Angles;
use catlaser_core::traits::{Actuator, ActuatorError};
use embedded_hal::pwm::SetDutyCycle;

/// Servo pulse timing
#[derive(Debug, Clone, Copy)]
pub struct ServoConfig {
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u32,
    /// Pulse width at `max_angle` (µs)
    pub max_pulse_us: u32,
    /// PWM period (µs)
    pub period_us: u32,
    /// Mechanical travel (degrees)
    pub max_angle: i16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 500,
            max_pulse_us: 2500,
            period_us: 20_000,
            max_angle: 180,
        }
    }
}

impl ServoConfig {
    /// Pulse width for an angle, clipped to the travel
    pub fn pulse_us(&self, angle: i16) -> u32 {
        let angle = angle.clamp(0, self.max_angle) as u32;
        let span = self.max_pulse_us - self.min_pulse_us;
        self.min_pulse_us + angle * span / self.max_angle as u32
    }

    /// Duty value for an angle on a channel with `max_duty` full scale
    pub fn duty(&self, angle: i16, max_duty: u16) -> u16 {
        let duty = self.pulse_us(angle) as u64 * max_duty as u64 / self.period_us as u64;
        duty.min(max_duty as u64) as u16
    }
}

/// One servo axis
pub struct ServoAxis<P> {
    pwm: P,
    config: ServoConfig,
    /// Current output position (degrees, fractional while slewing)
    position: f32,
    /// Commanded target (degrees)
    target: i16,
    /// Slew rate (deg/s)
    speed_deg_per_sec: f32,
}

impl<P: SetDutyCycle> ServoAxis<P> {
    /// Create an axis and drive it to `start` immediately
    pub fn new(pwm: P, config: ServoConfig, start: i16) -> Result<Self, ActuatorError> {
        if !(0..=config.max_angle).contains(&start) {
            return Err(ActuatorError::OutOfRange);
        }
        let mut axis = Self {
            pwm,
            config,
            position: start as f32,
            target: start,
            speed_deg_per_sec: 0.0,
        };
        axis.write()?;
        Ok(axis)
    }

    /// Set a new target and slew rate
    pub fn set_target(&mut self, angle: i16, speed_deg_per_sec: f32) -> Result<(), ActuatorError> {
        if !(0..=self.config.max_angle).contains(&angle) {
            return Err(ActuatorError::OutOfRange);
        }
        self.target = angle;
        self.speed_deg_per_sec = speed_deg_per_sec.max(0.0);
        Ok(())
    }

    /// Advance the slew by `delta_ms` and write the output
    pub fn update(&mut self, delta_ms: u32) -> Result<(), ActuatorError> {
        let target = self.target as f32;
        let step = self.speed_deg_per_sec * delta_ms as f32 / 1000.0;
        let remaining = target - self.position;

        if remaining > step {
            self.position += step;
        } else if remaining < -step {
            self.position -= step;
        } else {
            self.position = target;
        }

        self.write()
    }

    /// Output position rounded to whole degrees
    pub fn position(&self) -> i16 {
        round_deg(self.position)
    }

    /// Commanded target
    pub fn target(&self) -> i16 {
        self.target
    }

    pub fn is_at_target(&self) -> bool {
        self.position == self.target as f32
    }

    /// Release the PWM channel
    pub fn free(self) -> P {
        self.pwm
    }

    fn write(&mut self) -> Result<(), ActuatorError> {
        let duty = self.config.duty(self.position(), self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::Hardware)
    }
}

/// Round half away from zero without float intrinsics
fn round_deg(value: f32) -> i16 {
    if value >= 0.0 {
        (value + 0.5) as i16
    } else {
        (value - 0.5) as i16
    }
}

/// Pan and tilt servos as one actuator
pub struct PanTiltServos<P, T> {
    pub pan: ServoAxis<P>,
    pub tilt: ServoAxis<T>,
}

impl<P: SetDutyCycle, T: SetDutyCycle> PanTiltServos<P, T> {
    pub fn new(pan: P, tilt: T, config: ServoConfig, start: Angles) -> Result<Self, ActuatorError> {
        Ok(Self {
            pan: ServoAxis::new(pan, config, start.pan)?,
            tilt: ServoAxis::new(tilt, config, start.tilt)?,
        })
    }

    /// Advance both axes by `delta_ms`
    pub fn update(&mut self, delta_ms: u32) -> Result<(), ActuatorError> {
        self.pan.update(delta_ms)?;
        self.tilt.update(delta_ms)
    }

    /// Current output position
    pub fn position(&self) -> Angles {
        Angles::new(self.pan.position(), self.tilt.position())
    }
}

impl<P: SetDutyCycle, T: SetDutyCycle> Actuator for PanTiltServos<P, T> {
    fn move_to(&mut self, command: &MotionCommand) -> Result<(), ActuatorError> {
        let target = command.target;
        if !(0..=self.pan.config.max_angle).contains(&target.pan)
            || !(0..=self.tilt.config.max_angle).contains(&target.tilt)
        {
            return Err(ActuatorError::OutOfRange);
        }
        self.pan.set_target(target.pan, command.speed_deg_per_sec)?;
        self.tilt.set_target(target.tilt, command.speed_deg_per_sec)
    }

    fn is_at_target(&self) -> bool {
        self.pan.is_at_target() && self.tilt.is_at_target()
    }
}
