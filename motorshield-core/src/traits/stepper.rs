//! Stepper motor driver trait
//!
//! Bipolar steppers on the shield use two half-bridge pairs (one per coil)
//! and two PWM channels. Motion is open loop: the driver only counts phase.

use embedded_hal::delay::DelayNs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stepper rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Advance the phase index
    Forward,
    /// Retreat the phase index
    Backward,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Stepping style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepStyle {
    /// One coil energized per full step
    #[default]
    Single,
    /// Two coils energized per full step (more torque)
    Double,
    /// Alternating single/double coil, one half step per call
    Interleave,
    /// Sine/cosine PWM interpolation, one microstep per call
    Microstep,
}

impl StepStyle {
    /// All styles, in declaration order
    pub const ALL: [StepStyle; 4] = [
        StepStyle::Single,
        StepStyle::Double,
        StepStyle::Interleave,
        StepStyle::Microstep,
    ];
}

/// Errors that can occur configuring a stepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepperError {
    /// Requested speed was zero RPM
    InvalidSpeed,
    /// Invalid configuration (zero steps per revolution)
    InvalidConfig,
}

/// Trait for open-loop stepper drivers
pub trait StepperDriver {
    /// Set the speed in RPM used by [`StepperDriver::step`]
    fn set_speed(&mut self, rpm: u16) -> Result<(), StepperError>;

    /// Move one increment of `style` and commit the outputs
    ///
    /// Returns the phase index after the move.
    fn onestep(&mut self, dir: Direction, style: StepStyle) -> u16;

    /// Move `steps` increments of `style`, sleeping between each
    ///
    /// Blocks for the full duration of the move.
    fn step<D: DelayNs>(&mut self, delay: &mut D, steps: u16, dir: Direction, style: StepStyle);

    /// De-energize both coils without losing phase
    fn release(&mut self);

    /// Current phase index
    fn current_step(&self) -> u16;
}
