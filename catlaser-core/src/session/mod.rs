//! Session guard
//!
//! Enforces the maximum continuous run time and the mandatory cooldown
//! that follows it. The guard is explicit, finite, and deterministic.

pub mod decision;
pub mod guard;

pub use decision::{DecisionKind, RunDecision};
pub use guard::{RuntimeSession, SessionGuard, SessionState, MS_PER_MINUTE};
