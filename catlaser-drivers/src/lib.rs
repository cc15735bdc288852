//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in catlaser-core on top of `embedded-hal` 1.0:
//!
//! - Hobby servos on PWM channels (pan and tilt axes)
//! - Laser diode on a GPIO pin

#![no_std]
#![deny(unsafe_code)]

pub mod laser;
pub mod servo;

pub use laser::GpioLaser;
pub use servo::{PanTiltServos, ServoAxis, ServoConfig};
