//! PWM output on one side of an RP2040 PWM slice
//!
//! The slice counter wraps at `top` and the output is high while the
//! counter is below the compare value, so the frequency is
//! `clk_sys / (divider * (top + 1))`. The divider is kept as small as
//! possible to leave the most counts for duty resolution.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use motorshield_hal::{PwmOutput, MAX_DUTY};

/// Which output of the slice drives the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    A,
    B,
}

/// Largest integer clock divider of a slice
const MAX_DIVIDER: u32 = 255;

/// Divider and wrap value for a frequency
///
/// Frequencies above `clk_sys / 2` clamp to `top = 1`.
pub fn timing_for(clk_hz: u32, hz: u32) -> (u8, u16) {
    let hz = hz.max(1);
    let counts = clk_hz / hz;

    let divider = counts.div_ceil(u16::MAX as u32 + 1).clamp(1, MAX_DIVIDER);
    let top = (counts / divider).saturating_sub(1).clamp(1, u16::MAX as u32);

    (divider as u8, top as u16)
}

/// Compare value giving `duty / 255` on time
pub fn compare_for(top: u16, duty: u8) -> u16 {
    ((top as u32 + 1) * duty as u32 / MAX_DUTY as u32) as u16
}

/// PWM channel backed by one slice output
pub struct RpPwm<'d> {
    pwm: Pwm<'d>,
    side: Side,
    config: PwmConfig,
    duty: u8,
}

impl<'d> RpPwm<'d> {
    /// Take a slice configured with its output pin, starting at 0% duty
    pub fn new(pwm: Pwm<'d>, side: Side) -> Self {
        let mut wrapped = Self {
            pwm,
            side,
            config: PwmConfig::default(),
            duty: 0,
        };
        wrapped.apply();
        wrapped
    }

    fn apply(&mut self) {
        let compare = compare_for(self.config.top, self.duty);
        match self.side {
            Side::A => self.config.compare_a = compare,
            Side::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}

impl PwmOutput for RpPwm<'_> {
    fn set_frequency(&mut self, hz: u32) {
        let (divider, top) = timing_for(clk_sys_freq(), hz);
        self.config.divider = divider.into();
        self.config.top = top;
        self.apply();
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.apply();
    }

    fn duty(&self) -> u8 {
        self.duty
    }
}
