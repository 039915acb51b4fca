//! Fixed latch bit and PWM channel layout of the shield
//!
//! The 74HCT595 outputs are not wired in motor order, so every motor
//! carries its bit numbers from this table. The mapping is fixed by the
//! board and never reconfigured at run time.
//!
//! | port | A bit | B bit | PWM channel | group |
//! |------|-------|-------|-------------|-------|
//! | M1   | 2     | 3     | 0           | M1/M2 |
//! | M2   | 1     | 4     | 1           | M1/M2 |
//! | M3   | 5     | 7     | 2           | M3/M4 |
//! | M4   | 0     | 6     | 3           | M3/M4 |

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stepping::tables::{LINE_A, LINE_B, LINE_C, LINE_D};

/// Number of PWM channels on the shield
pub const PWM_CHANNELS: usize = 4;

/// Number of PWM timer groups on the shield
pub const CHANNEL_GROUPS: usize = 2;

/// DC motor output (M1-M4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotorPort {
    M1,
    M2,
    M3,
    M4,
}

impl MotorPort {
    /// All ports in board order
    pub const ALL: [MotorPort; 4] = [MotorPort::M1, MotorPort::M2, MotorPort::M3, MotorPort::M4];

    /// Port number as printed on the board (1-4)
    pub const fn number(self) -> u8 {
        match self {
            MotorPort::M1 => 1,
            MotorPort::M2 => 2,
            MotorPort::M3 => 3,
            MotorPort::M4 => 4,
        }
    }

    /// Latch bit number of the A half-bridge input
    pub const fn a_bit(self) -> u8 {
        match self {
            MotorPort::M1 => 2,
            MotorPort::M2 => 1,
            MotorPort::M3 => 5,
            MotorPort::M4 => 0,
        }
    }

    /// Latch bit number of the B half-bridge input
    pub const fn b_bit(self) -> u8 {
        match self {
            MotorPort::M1 => 3,
            MotorPort::M2 => 4,
            MotorPort::M3 => 7,
            MotorPort::M4 => 6,
        }
    }

    /// Latch mask of the A input
    pub const fn a_mask(self) -> u8 {
        1 << self.a_bit()
    }

    /// Latch mask of the B input
    pub const fn b_mask(self) -> u8 {
        1 << self.b_bit()
    }

    /// Latch mask covering both inputs
    pub const fn mask(self) -> u8 {
        self.a_mask() | self.b_mask()
    }

    /// PWM channel driving this port's enable input
    pub const fn pwm_channel(self) -> PwmChannel {
        match self {
            MotorPort::M1 => PwmChannel::Ch0,
            MotorPort::M2 => PwmChannel::Ch1,
            MotorPort::M3 => PwmChannel::Ch2,
            MotorPort::M4 => PwmChannel::Ch3,
        }
    }
}

/// Logical PWM channel (0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PwmChannel {
    Ch0,
    Ch1,
    Ch2,
    Ch3,
}

impl PwmChannel {
    /// All channels in index order
    pub const ALL: [PwmChannel; PWM_CHANNELS] =
        [PwmChannel::Ch0, PwmChannel::Ch1, PwmChannel::Ch2, PwmChannel::Ch3];

    /// Channel index (0-3)
    pub const fn index(self) -> usize {
        match self {
            PwmChannel::Ch0 => 0,
            PwmChannel::Ch1 => 1,
            PwmChannel::Ch2 => 2,
            PwmChannel::Ch3 => 3,
        }
    }

    /// Timer group the channel shares its base frequency with
    pub const fn group(self) -> ChannelGroup {
        match self {
            PwmChannel::Ch0 | PwmChannel::Ch1 => ChannelGroup::Motor12,
            PwmChannel::Ch2 | PwmChannel::Ch3 => ChannelGroup::Motor34,
        }
    }
}

/// Pair of channels driven from the same timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChannelGroup {
    /// Channels 0 and 1 (M1, M2)
    Motor12,
    /// Channels 2 and 3 (M3, M4)
    Motor34,
}

impl ChannelGroup {
    /// Group index (0-1)
    pub const fn index(self) -> usize {
        match self {
            ChannelGroup::Motor12 => 0,
            ChannelGroup::Motor34 => 1,
        }
    }
}

/// Stepper output (two adjacent motor ports)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepperPort {
    /// M1 (coil 1) + M2 (coil 2)
    Port1,
    /// M3 (coil 1) + M4 (coil 2)
    Port2,
}

impl StepperPort {
    /// Port number (1-2)
    pub const fn number(self) -> u8 {
        match self {
            StepperPort::Port1 => 1,
            StepperPort::Port2 => 2,
        }
    }

    /// Motor ports used for coil 1 and coil 2
    pub const fn coil_ports(self) -> (MotorPort, MotorPort) {
        match self {
            StepperPort::Port1 => (MotorPort::M1, MotorPort::M2),
            StepperPort::Port2 => (MotorPort::M3, MotorPort::M4),
        }
    }

    /// PWM channels for coil 1 and coil 2
    pub const fn pwm_channels(self) -> (PwmChannel, PwmChannel) {
        let (coil1, coil2) = self.coil_ports();
        (coil1.pwm_channel(), coil2.pwm_channel())
    }

    /// Latch mask covering all four coil inputs
    pub const fn mask(self) -> u8 {
        let (coil1, coil2) = self.coil_ports();
        coil1.mask() | coil2.mask()
    }

    /// Translate logical coil lines into latch bits
    ///
    /// Line a/c are coil 1 A/B, line b/d are coil 2 A/B.
    pub const fn latch_bits(self, lines: u8) -> u8 {
        let (coil1, coil2) = self.coil_ports();
        let mut bits = 0;
        if lines & LINE_A != 0 {
            bits |= coil1.a_mask();
        }
        if lines & LINE_B != 0 {
            bits |= coil2.a_mask();
        }
        if lines & LINE_C != 0 {
            bits |= coil1.b_mask();
        }
        if lines & LINE_D != 0 {
            bits |= coil2.b_mask();
        }
        bits
    }
}
