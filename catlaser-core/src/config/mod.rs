//! Configuration types
//!
//! Device configuration, the preset table, load-time validation and the
//! binary snapshot used for persistence and remote updates.

pub mod preset;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod types;
pub mod validation;

pub use preset::{EffectiveParams, PresetEntry};
pub use types::*;
pub use validation::ConfigError;
