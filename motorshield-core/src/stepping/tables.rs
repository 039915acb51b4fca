//! Stepping lookup tables
//!
//! Coil patterns are expressed over four logical lines, independent of
//! which stepper port they end up on:
//!
//! - `a`: coil 1, A side
//! - `b`: coil 2, A side
//! - `c`: coil 1, B side
//! - `d`: coil 2, B side
//!
//! [`crate::layout::StepperPort::latch_bits`] maps them onto latch bits.

/// Coil 1, A side
pub const LINE_A: u8 = 0b0001;
/// Coil 2, A side
pub const LINE_B: u8 = 0b0010;
/// Coil 1, B side
pub const LINE_C: u8 = 0b0100;
/// Coil 2, B side
pub const LINE_D: u8 = 0b1000;

/// One electrical cycle in half steps
///
/// Even entries energize one coil, odd entries two.
pub const HALF_STEP_TABLE: [u8; 8] = [
    LINE_A,
    LINE_A | LINE_B,
    LINE_B,
    LINE_B | LINE_C,
    LINE_C,
    LINE_C | LINE_D,
    LINE_D,
    LINE_D | LINE_A,
];

/// Single-coil full steps (even half steps)
pub const SINGLE_TABLE: [u8; 4] = [LINE_A, LINE_B, LINE_C, LINE_D];

/// Two-coil full steps (odd half steps)
pub const DOUBLE_TABLE: [u8; 4] = [
    LINE_A | LINE_B,
    LINE_B | LINE_C,
    LINE_C | LINE_D,
    LINE_D | LINE_A,
];

/// Lines active in each microstep quadrant
///
/// The sign of each coil's current picks its side; the magnitude is the
/// PWM duty.
pub const MICROSTEP_QUADRANT_LINES: [u8; 4] = DOUBLE_TABLE;

/// Quarter sine, 8 microsteps per full step
pub const MICROSTEP_CURVE_8: [u8; 9] = [0, 50, 98, 142, 180, 212, 236, 250, 255];

/// Quarter sine, 16 microsteps per full step
pub const MICROSTEP_CURVE_16: [u8; 17] = [
    0, 25, 50, 74, 98, 120, 141, 162, 180, 197, 212, 225, 236, 244, 250, 253, 255,
];
