//! GPIO pin abstractions
//!
//! Provides the digital output trait used for the shift-register control
//! lines and for PWM channels that fall back to plain on/off drive.

use core::convert::Infallible;

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Adapter for `embedded-hal` 1.0 output pins
///
/// Only pins whose error type is [`Infallible`] are accepted, which covers
/// the on-chip GPIO of every common HAL. The last driven level is tracked
/// locally so `is_set_high` does not need a `StatefulOutputPin`.
pub struct EhOutputPin<T> {
    pin: T,
    high: bool,
}

impl<T> EhOutputPin<T>
where
    T: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    /// Wrap a pin, driving it low
    pub fn new(pin: T) -> Self {
        let mut wrapped = Self { pin, high: true };
        wrapped.set_low();
        wrapped
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> T {
        self.pin
    }
}

impl<T> OutputPin for EhOutputPin<T>
where
    T: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        match self.pin.set_high() {
            Ok(()) => self.high = true,
            Err(never) => match never {},
        }
    }

    fn set_low(&mut self) {
        match self.pin.set_low() {
            Ok(()) => self.high = false,
            Err(never) => match never {},
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
