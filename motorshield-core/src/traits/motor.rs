//! DC motor driver trait
//!
//! A DC motor on the shield is one half-bridge pair (two latch bits) plus
//! one PWM channel for speed.

use super::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command for a DC motor's half-bridge pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// A high, B low
    Forward,
    /// A low, B high
    Backward,
    /// Both outputs driven to the same level (motor terminals shorted)
    Brake,
    /// Both outputs inactive, the motor coasts
    Release,
}

impl From<Direction> for Command {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Forward => Command::Forward,
            Direction::Backward => Command::Backward,
        }
    }
}

/// Trait for DC motors with PWM speed control
pub trait DcMotorDriver {
    /// Apply a command to the motor's half-bridge pair
    fn run(&mut self, cmd: Command);

    /// Set the PWM duty (0-255) of the motor's channel
    fn set_speed(&mut self, speed: u8);

    /// Get the last speed set
    fn speed(&self) -> u8;
}
