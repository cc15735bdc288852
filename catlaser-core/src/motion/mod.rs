//! Motion generation
//!
//! One strategy per motion mode behind the [`MotionStrategy`] trait, and
//! the [`MotionEngine`] that dispatches to them and clamps their output.

pub mod engine;
pub mod orbit;
pub mod random;
pub mod scan;
pub mod smart;
pub mod strategy;
pub mod trig;

pub use engine::{MotionCommand, MotionEngine, MotionState};
pub use orbit::OrbitStrategy;
pub use random::RandomStrategy;
pub use scan::{ScanState, ScanStrategy, SweepDirection};
pub use smart::SmartStrategy;
pub use strategy::{MotionStrategy, RawStep, StepContext};
