//! Run decisions emitted by the session guard

use crate::config::EffectiveParams;

/// Final per-tick verdict
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunDecision {
    /// Move with these parameters; the only state in which the laser may be on
    Run(EffectiveParams),
    /// Go to the park position and hold
    Park,
    /// Cooldown while the schedule is still active
    Pause,
}

/// Decision without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecisionKind {
    Run,
    Park,
    Pause,
}

impl RunDecision {
    /// Check if motion and laser are permitted
    pub fn is_run(&self) -> bool {
        matches!(self, RunDecision::Run(_))
    }

    /// Parameters when running
    pub fn params(&self) -> Option<&EffectiveParams> {
        match self {
            RunDecision::Run(params) => Some(params),
            _ => None,
        }
    }

    /// Strip the parameters
    pub fn kind(&self) -> DecisionKind {
        match self {
            RunDecision::Run(_) => DecisionKind::Run,
            RunDecision::Park => DecisionKind::Park,
            RunDecision::Pause => DecisionKind::Pause,
        }
    }
}

impl DecisionKind {
    /// Wire value
    pub const fn to_byte(self) -> u8 {
        match self {
            DecisionKind::Run => 0,
            DecisionKind::Park => 1,
            DecisionKind::Pause => 2,
        }
    }

    /// Parse a wire value
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(DecisionKind::Run),
            1 => Some(DecisionKind::Park),
            2 => Some(DecisionKind::Pause),
            _ => None,
        }
    }
}
