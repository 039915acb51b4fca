//! Step timing
//!
//! The user gives a speed in RPM; the stepper needs a delay between calls
//! to `onestep`. Finer styles take more calls per full step, so their delay
//! is divided down to keep the same rotational speed.

use crate::config::Microsteps;
use crate::traits::{StepStyle, StepperError};

/// Microseconds in one minute
pub const MICROS_PER_MINUTE: u32 = 60_000_000;

/// Microseconds per full step for a given speed
///
/// Returns `None` if either argument is zero.
pub fn us_per_step(revsteps: u16, rpm: u16) -> Option<u32> {
    let steps_per_minute = (revsteps as u32).checked_mul(rpm as u32)?;
    if steps_per_minute == 0 {
        return None;
    }
    Some(MICROS_PER_MINUTE / steps_per_minute)
}

/// Number of `onestep` calls that make up one full step
pub const fn substeps(style: StepStyle, microsteps: Microsteps) -> u16 {
    match style {
        StepStyle::Single | StepStyle::Double => 1,
        StepStyle::Interleave => 2,
        StepStyle::Microstep => microsteps.per_step(),
    }
}

/// Resolution of the carried remainder, in parts of a microsecond
///
/// Every `substeps` value (1, 2, 8 or 16) divides it, so the remainder
/// keeps its meaning when the style changes between calls.
const CARRY_SCALE: u64 = 16;

/// Per-stepper timing state
///
/// `us_per_step / substeps` rarely divides evenly. The remainder is carried
/// between calls (in sixteenths of a microsecond) and paid out as whole
/// microseconds, so the total delay stays within one microsecond of the
/// exact value, even when styles are mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTiming {
    us_per_step: u32,
    carry: u32,
}

impl StepTiming {
    /// No delay until a speed is set
    pub const fn new() -> Self {
        Self {
            us_per_step: 0,
            carry: 0,
        }
    }

    /// Microseconds per full step
    pub const fn us_per_step(&self) -> u32 {
        self.us_per_step
    }

    /// Recompute the step interval and reset the carried remainder
    pub fn set_rpm(&mut self, revsteps: u16, rpm: u16) -> Result<u32, StepperError> {
        if revsteps == 0 {
            return Err(StepperError::InvalidConfig);
        }
        let us = us_per_step(revsteps, rpm).ok_or(StepperError::InvalidSpeed)?;
        self.us_per_step = us;
        self.carry = 0;
        Ok(us)
    }

    /// Delay to wait after the next `onestep` call
    pub fn next_delay_us(&mut self, substeps: u16) -> u32 {
        let substeps = substeps.max(1) as u64;
        let scaled = self.us_per_step as u64 * CARRY_SCALE / substeps + self.carry as u64;

        self.carry = (scaled % CARRY_SCALE) as u32;
        (scaled / CARRY_SCALE) as u32
    }
}
