//! Shield-level configuration

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::PwmFrequency;
use crate::layout::StepperPort;
use crate::stepping::tables::{MICROSTEP_CURVE_16, MICROSTEP_CURVE_8};

/// Microstep resolution (subdivisions per full step)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Microsteps {
    Eight,
    #[default]
    Sixteen,
}

impl Microsteps {
    /// Microsteps per full step
    pub const fn per_step(self) -> u16 {
        match self {
            Microsteps::Eight => 8,
            Microsteps::Sixteen => 16,
        }
    }

    /// Microsteps per electrical cycle (four full steps)
    pub const fn cycle_len(self) -> u16 {
        self.per_step() * 4
    }

    /// Quarter-sine duty curve, `per_step() + 1` entries from 0 to 255
    pub const fn curve(self) -> &'static [u8] {
        match self {
            Microsteps::Eight => &MICROSTEP_CURVE_8,
            Microsteps::Sixteen => &MICROSTEP_CURVE_16,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A PWM frequency of 0 Hz was configured
    InvalidFrequency,
    /// Platform has one timebase but the configured rates differ
    TimebaseMismatch,
}

/// Construction-time constants for one shield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShieldConfig {
    /// Default PWM rate for DC motors
    pub dc_motor_rate: PwmFrequency,
    /// PWM rate for stepper port 1 (M1/M2)
    pub stepper1_rate: PwmFrequency,
    /// PWM rate for stepper port 2 (M3/M4)
    pub stepper2_rate: PwmFrequency,
    /// Microstep resolution
    pub microsteps: Microsteps,
    /// All four PWM outputs run from a single timer
    pub shared_timebase: bool,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self::avr()
    }
}

impl ShieldConfig {
    /// Classic AVR board: timer 2 for M1/M2, timer 0 for M3/M4
    pub const fn avr() -> Self {
        Self {
            dc_motor_rate: PwmFrequency::MOTOR34_8KHZ,
            stepper1_rate: PwmFrequency::MOTOR12_64KHZ,
            stepper2_rate: PwmFrequency::MOTOR34_64KHZ,
            microsteps: Microsteps::Sixteen,
            shared_timebase: false,
        }
    }

    /// PIC32 board: one timebase shared by all four outputs
    pub const fn pic32() -> Self {
        Self {
            dc_motor_rate: PwmFrequency::PIC32_39KHZ,
            stepper1_rate: PwmFrequency::PIC32_39KHZ,
            stepper2_rate: PwmFrequency::PIC32_39KHZ,
            microsteps: Microsteps::Sixteen,
            shared_timebase: true,
        }
    }

    /// Same configuration with a different microstep resolution
    pub const fn with_microsteps(mut self, microsteps: Microsteps) -> Self {
        self.microsteps = microsteps;
        self
    }

    /// PWM rate used by a stepper port
    pub const fn stepper_rate(&self, port: StepperPort) -> PwmFrequency {
        match port {
            StepperPort::Port1 => self.stepper1_rate,
            StepperPort::Port2 => self.stepper2_rate,
        }
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rates = [self.dc_motor_rate, self.stepper1_rate, self.stepper2_rate];
        if rates.iter().any(|rate| rate.hz() == 0) {
            return Err(ConfigError::InvalidFrequency);
        }

        if self.shared_timebase && rates.iter().any(|&rate| rate != self.stepper1_rate) {
            return Err(ConfigError::TimebaseMismatch);
        }

        Ok(())
    }
}
