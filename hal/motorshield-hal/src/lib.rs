//! Motorshield Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the motor shield
//! drivers are written against. Chip-specific HALs (RP2040, ...) implement
//! them; anything that already implements the `embedded-hal` 1.0 traits can
//! be plugged in through the adapters in [`gpio`] and [`pwm`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  motorshield-drivers (latch, PWM, motors)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  motorshield-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ motorshield-  │       │ embedded-hal  │
//! │  hal-rp2040   │       │   adapters    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (latch control lines, on/off fallback)
//! - [`pwm::PwmOutput`] - 8-bit duty PWM output with a configurable base frequency
//!
//! Both are infallible: driving a pin or a compare register on the boards
//! this stack targets cannot fail, so the motor drivers have no error path
//! on their hot path.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use gpio::{EhOutputPin, OutputPin};
pub use pwm::{EhPwm, PwmOutput, MAX_DUTY};
