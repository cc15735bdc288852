//! SCAN strategy
//!
//! Boustrophedon raster over the safe range: sweep pan in fixed steps,
//! reverse at each edge and advance one tilt row. Past the last row the
//! raster wraps to the first. The state is a small `Copy` value so a
//! sweep can be saved and resumed exactly.

use super::strategy::{MotionStrategy, RawStep, StepContext};
use crate::config::MotionMode;
use crate::safety::{Angles, AxisRange};

/// Pan step between raster points (degrees)
pub const SCAN_PAN_STEP: i16 = 6;

/// Tilt step between raster rows (degrees)
pub const SCAN_ROW_STEP: i16 = 6;

/// Horizontal sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepDirection {
    /// Towards `pan.hi`
    #[default]
    Increasing,
    /// Towards `pan.lo`
    Decreasing,
}

impl SweepDirection {
    fn reversed(self) -> Self {
        match self {
            SweepDirection::Increasing => SweepDirection::Decreasing,
            SweepDirection::Decreasing => SweepDirection::Increasing,
        }
    }
}

/// Raster position, resumable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanState {
    /// Last emitted pan
    pub pan: i16,
    /// Last emitted tilt (current row)
    pub tilt: i16,
    /// Direction of the current row
    pub direction: SweepDirection,
    /// False until the first point is emitted
    pub started: bool,
}

/// Raster sweep
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStrategy {
    state: ScanState,
}

impl ScanStrategy {
    pub const fn new() -> Self {
        Self {
            state: ScanState {
                pan: 0,
                tilt: 0,
                direction: SweepDirection::Increasing,
                started: false,
            },
        }
    }

    /// Snapshot of the raster position
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Resume from a saved raster position
    pub fn restore(&mut self, state: ScanState) {
        self.state = state;
    }

    /// Advance one raster point within the given ranges
    fn advance(&mut self, pan: &AxisRange, tilt: &AxisRange) -> Angles {
        let s = &mut self.state;

        if !s.started {
            *s = ScanState {
                pan: pan.lo,
                tilt: tilt.lo,
                direction: SweepDirection::Increasing,
                started: true,
            };
            return Angles::new(s.pan, s.tilt);
        }

        // A restored state or a config change may leave us outside the range
        s.pan = pan.clamp(s.pan);
        s.tilt = tilt.clamp(s.tilt);

        let at_edge = match s.direction {
            SweepDirection::Increasing => s.pan >= pan.hi,
            SweepDirection::Decreasing => s.pan <= pan.lo,
        };

        if at_edge {
            s.direction = s.direction.reversed();
            s.tilt = if s.tilt >= tilt.hi {
                tilt.lo
            } else {
                tilt.clamp(s.tilt.saturating_add(SCAN_ROW_STEP))
            };
        } else {
            let next = match s.direction {
                SweepDirection::Increasing => s.pan.saturating_add(SCAN_PAN_STEP),
                SweepDirection::Decreasing => s.pan.saturating_sub(SCAN_PAN_STEP),
            };
            s.pan = pan.clamp(next);
        }

        Angles::new(s.pan, s.tilt)
    }
}

impl MotionStrategy for ScanStrategy {
    fn mode(&self) -> MotionMode {
        MotionMode::Scan
    }

    fn reset(&mut self) {
        self.state = ScanState::default();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> RawStep {
        let target = self.advance(&ctx.range.pan, &ctx.range.tilt);
        RawStep {
            target,
            speed_deg_per_sec: ctx.params.speed_deg_per_sec,
            dwell_ms: ctx.params.dwell_ms_min,
        }
    }
}
