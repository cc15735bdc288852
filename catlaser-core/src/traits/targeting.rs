//! External target source for SMART motion

use crate::safety::Angles;

/// Supplies candidate targets, e.g. from a camera tracker
///
/// Candidates are raw angles; the core clamps them before use.
pub trait TargetingProvider {
    /// Next candidate, or `None` if nothing is tracked
    fn candidate(&mut self) -> Option<Angles>;
}

/// Provider that never has a candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTargeting;

impl TargetingProvider for NoTargeting {
    fn candidate(&mut self) -> Option<Angles> {
        None
    }
}
