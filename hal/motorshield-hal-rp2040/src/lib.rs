//! RP2040-specific HAL for the motor shield
//!
//! Implements the `motorshield-hal` traits on top of embassy-rp:
//!
//! - [`gpio::RpOutput`] for the latch control lines and on/off fallbacks
//! - [`pwm::RpPwm`] for the four speed channels, one PWM slice output each
//! - [`pins::ShieldPins`] to bring up the latch lines in a safe state and
//!   hand them to the latch driver
//!
//! Blocking delays between steps come from `embassy_time::Delay`, which
//! implements `embedded_hal::delay::DelayNs`.

#![no_std]

pub mod gpio;
pub mod pins;
pub mod pwm;

pub use gpio::RpOutput;
pub use pins::ShieldPins;
pub use pwm::{RpPwm, Side};

// Re-export so integrators need not depend on embassy-time directly
pub use embassy_time::Delay;
