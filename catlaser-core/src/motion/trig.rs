//! Fixed-point sine and cosine
//!
//! Angles are 12-bit binary angles: [`PHASE_PER_TURN`] units make one full
//! turn. Results are Q15 (`Q15_ONE` == 1.0). A 65-entry quarter-wave table
//! with linear interpolation keeps the error below 0.1%, with no float
//! transcendental functions on the target.

/// Binary angle units per full turn
pub const PHASE_PER_TURN: u16 = 4096;

/// Binary angle units per quarter turn
const PHASE_PER_QUARTER: u16 = PHASE_PER_TURN / 4;

/// Q15 representation of 1.0
pub const Q15_ONE: i32 = 32767;

/// Phase units between table entries
const TABLE_STEP: u16 = PHASE_PER_QUARTER / 64;

/// sin(i / 64 * pi / 2) in Q15, i = 0..=64
const QUARTER_SINE: [i16; 65] = [
    0, 804, 1608, 2410, 3212, 4011, 4808, 5602,
    6393, 7179, 7962, 8739, 9512, 10278, 11039, 11793,
    12539, 13279, 14010, 14732, 15446, 16151, 16846, 17530,
    18204, 18868, 19519, 20159, 20787, 21403, 22005, 22594,
    23170, 23731, 24279, 24811, 25329, 25832, 26319, 26790,
    27245, 27683, 28105, 28510, 28898, 29268, 29621, 29956,
    30273, 30571, 30852, 31113, 31356, 31580, 31785, 31971,
    32137, 32285, 32412, 32521, 32609, 32678, 32728, 32757,
    32767,
];

/// Sine of a binary angle, Q15
pub fn sin_q15(phase: u16) -> i32 {
    let phase = phase % PHASE_PER_TURN;
    let offset = phase % PHASE_PER_QUARTER;

    match phase / PHASE_PER_QUARTER {
        0 => quarter_sine(offset),
        1 => quarter_sine(PHASE_PER_QUARTER - offset),
        2 => -quarter_sine(offset),
        _ => -quarter_sine(PHASE_PER_QUARTER - offset),
    }
}

/// Cosine of a binary angle, Q15
pub fn cos_q15(phase: u16) -> i32 {
    sin_q15((phase % PHASE_PER_TURN) + PHASE_PER_QUARTER)
}

/// Scale `value` by a Q15 factor, rounding to nearest
pub fn mul_q15(value: i32, factor: i32) -> i32 {
    let product = value * factor;
    let half = Q15_ONE / 2;
    if product >= 0 {
        (product + half) / Q15_ONE
    } else {
        (product - half) / Q15_ONE
    }
}

/// First-quadrant sine for `offset` in `0..=PHASE_PER_QUARTER`
fn quarter_sine(offset: u16) -> i32 {
    let index = (offset / TABLE_STEP) as usize;
    let frac = (offset % TABLE_STEP) as i32;
    let low = QUARTER_SINE[index] as i32;
    if frac == 0 {
        return low;
    }
    let high = QUARTER_SINE[index + 1] as i32;
    low + (high - low) * frac / TABLE_STEP as i32
}
