//! PWM base frequencies
//!
//! Each supported platform picks its timer prescalers from a small table.
//! The values here are the frequencies those prescalers produce; a chip HAL
//! turns them back into its own divider settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// PWM base frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PwmFrequency(pub u32);

impl PwmFrequency {
    // AVR, timer 2 (M1/M2). Nominal rates of the no-prescale, /8, /32 and /64 settings.
    pub const MOTOR12_64KHZ: Self = Self(64_000);
    pub const MOTOR12_8KHZ: Self = Self(8_000);
    pub const MOTOR12_2KHZ: Self = Self(2_000);
    pub const MOTOR12_1KHZ: Self = Self(1_000);

    // AVR, timer 0 (M3/M4). Timer 0 has no /32 prescaler.
    pub const MOTOR34_64KHZ: Self = Self(64_000);
    pub const MOTOR34_8KHZ: Self = Self(8_000);
    pub const MOTOR34_1KHZ: Self = Self(1_000);

    // PIC32 timebase, 1:1 through 1:256 prescale (actual rates).
    pub const PIC32_312KHZ: Self = Self(312_000);
    pub const PIC32_156KHZ: Self = Self(156_000);
    pub const PIC32_78KHZ: Self = Self(78_000);
    pub const PIC32_39KHZ: Self = Self(39_000);
    pub const PIC32_19KHZ: Self = Self(19_000);
    pub const PIC32_9_7KHZ: Self = Self(9_700);
    pub const PIC32_4_8KHZ: Self = Self(4_800);
    pub const PIC32_1_2KHZ: Self = Self(1_200);

    /// Frequency in Hz
    pub const fn hz(self) -> u32 {
        self.0
    }
}

impl From<PwmFrequency> for u32 {
    fn from(freq: PwmFrequency) -> u32 {
        freq.0
    }
}
