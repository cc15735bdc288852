//! Safety clamping
//!
//! Keeps every commanded angle inside the mechanical bounds minus the
//! configured edge margin.

pub mod clamp;

pub use clamp::{clamp, Angles, AxisRange, SafeRange};
