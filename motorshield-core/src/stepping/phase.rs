//! Stepper phase state machine
//!
//! All styles share one phase index over a full electrical cycle of
//! `4 * R` microsteps (`R` = microstep resolution). Each style moves on its
//! own grid inside that index:
//!
//! | style      | unit  | offset | table length |
//! |------------|-------|--------|--------------|
//! | Single     | R     | 0      | 4            |
//! | Double     | R     | R/2    | 4            |
//! | Interleave | R/2   | 0      | 8            |
//! | Microstep  | 1     | 0      | 4 * R        |
//!
//! Because the index is a physical phase, switching style never loses
//! position and the microstep curve meets the full-step patterns exactly at
//! the quadrant boundaries.

use crate::config::Microsteps;
use crate::stepping::tables::{HALF_STEP_TABLE, MICROSTEP_QUADRANT_LINES};
use crate::traits::{Direction, StepStyle};

/// Full duty, used by every non-microstep style
const FULL_DUTY: u8 = 255;

/// Outputs for one stepper at one phase index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoilDrive {
    /// Active logical lines (see [`crate::stepping::tables`])
    pub lines: u8,
    /// PWM duty for coil 1
    pub duty_1: u8,
    /// PWM duty for coil 2
    pub duty_2: u8,
}

impl CoilDrive {
    /// Both coils off
    pub const RELEASED: Self = Self {
        lines: 0,
        duty_1: 0,
        duty_2: 0,
    };
}

/// Phase index of one stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepPhase {
    index: u16,
    microsteps: Microsteps,
}

impl StepPhase {
    /// Start at phase 0 (coil 1 fully on)
    pub const fn new(microsteps: Microsteps) -> Self {
        Self {
            index: 0,
            microsteps,
        }
    }

    /// Current phase index (0..cycle_len)
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Microstep resolution
    pub const fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Number of phase indices in one electrical cycle
    pub const fn cycle_len(&self) -> u16 {
        self.microsteps.cycle_len()
    }

    /// Grid of a style as `(unit, offset)` in phase index units
    pub const fn grid(&self, style: StepStyle) -> (u16, u16) {
        let n = self.microsteps.per_step();
        match style {
            StepStyle::Single => (n, 0),
            StepStyle::Double => (n, n / 2),
            StepStyle::Interleave => (n / 2, 0),
            StepStyle::Microstep => (1, 0),
        }
    }

    /// Number of entries in a style's table
    pub const fn table_len(&self, style: StepStyle) -> u16 {
        let (unit, _) = self.grid(style);
        self.cycle_len() / unit
    }

    /// Index relative to a style's grid origin
    fn relative(&self, offset: u16) -> u16 {
        let len = self.cycle_len();
        (self.index + len - offset) % len
    }

    /// Position in a style's table (0..table_len)
    ///
    /// Rounds down when the index is between grid points.
    pub fn position(&self, style: StepStyle) -> u16 {
        let (unit, offset) = self.grid(style);
        self.relative(offset) / unit
    }

    /// Check if the index sits on a style's grid
    pub fn is_on_grid(&self, style: StepStyle) -> bool {
        let (unit, offset) = self.grid(style);
        self.relative(offset) % unit == 0
    }

    /// Move one grid point of `style` in `dir`
    ///
    /// From a point on the grid this is exactly one unit. From between grid
    /// points it moves to the nearest grid point in the direction of travel.
    /// Returns the new index.
    pub fn advance(&mut self, dir: Direction, style: StepStyle) -> u16 {
        let (unit, offset) = self.grid(style);
        let len = self.cycle_len();
        let rem = self.relative(offset) % unit;

        self.index = match dir {
            Direction::Forward => (self.index + (unit - rem)) % len,
            Direction::Backward => {
                let back = if rem == 0 { unit } else { rem };
                (self.index + len - back) % len
            }
        };
        self.index
    }

    /// Outputs to apply for the current index
    pub fn drive(&self, style: StepStyle) -> CoilDrive {
        let n = self.microsteps.per_step();

        if style == StepStyle::Microstep {
            let quadrant = self.index / n;
            let k = self.index % n;
            let curve = self.microsteps.curve();
            let rising = curve[k as usize];
            let falling = curve[(n - k) as usize];

            // Coil 1 follows cosine, coil 2 sine; they swap roles every quadrant
            let (duty_1, duty_2) = if quadrant % 2 == 0 {
                (falling, rising)
            } else {
                (rising, falling)
            };

            CoilDrive {
                lines: MICROSTEP_QUADRANT_LINES[quadrant as usize],
                duty_1,
                duty_2,
            }
        } else {
            let half_step = self.index / (n / 2);
            CoilDrive {
                lines: HALF_STEP_TABLE[half_step as usize % HALF_STEP_TABLE.len()],
                duty_1: FULL_DUTY,
                duty_2: FULL_DUTY,
            }
        }
    }
}
