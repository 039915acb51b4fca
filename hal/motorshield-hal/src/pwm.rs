//! PWM output abstractions
//!
//! Motor shield channels take an 8-bit duty value (0 = off, 255 = fully on),
//! the resolution of the timers the board was designed around. The base
//! frequency is chosen once, when a motor claims the channel.

use core::convert::Infallible;

/// Maximum duty value (fully on)
pub const MAX_DUTY: u8 = 255;

/// A single PWM output
pub trait PwmOutput {
    /// Configure the base frequency in Hz
    ///
    /// Called once when the channel is allocated to a motor. Implementations
    /// that cannot reach the exact frequency should pick the closest one.
    fn set_frequency(&mut self, hz: u32);

    /// Set the duty cycle (0-255)
    fn set_duty(&mut self, duty: u8);

    /// Get the last duty cycle written
    fn duty(&self) -> u8;
}

/// Adapter for `embedded-hal` 1.0 PWM channels
///
/// `SetDutyCycle` has no notion of frequency, so the frequency requested by
/// the allocator is only recorded here; the wrapped channel must already be
/// running at the wanted rate.
pub struct EhPwm<T> {
    channel: T,
    duty: u8,
    frequency_hz: u32,
}

impl<T> EhPwm<T>
where
    T: embedded_hal::pwm::SetDutyCycle<Error = Infallible>,
{
    /// Wrap a PWM channel, setting it to 0% duty
    pub fn new(channel: T) -> Self {
        let mut wrapped = Self {
            channel,
            duty: MAX_DUTY,
            frequency_hz: 0,
        };
        wrapped.set_duty(0);
        wrapped
    }

    /// Frequency last requested by the allocator
    pub fn requested_frequency(&self) -> u32 {
        self.frequency_hz
    }

    /// Release the wrapped channel
    pub fn into_inner(self) -> T {
        self.channel
    }
}

impl<T> PwmOutput for EhPwm<T>
where
    T: embedded_hal::pwm::SetDutyCycle<Error = Infallible>,
{
    fn set_frequency(&mut self, hz: u32) {
        self.frequency_hz = hz;
    }

    fn set_duty(&mut self, duty: u8) {
        match self
            .channel
            .set_duty_cycle_fraction(duty as u16, MAX_DUTY as u16)
        {
            Ok(()) => self.duty = duty,
            Err(never) => match never {},
        }
    }

    fn duty(&self) -> u8 {
        self.duty
    }
}
