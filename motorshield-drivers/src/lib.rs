//! Hardware drivers for the motor shield
//!
//! This crate provides the concrete components behind the traits defined
//! in motorshield-core:
//!
//! - Latch driver (74HCT595 shift register protocol)
//! - PWM channel allocator (hardware PWM with on/off fallback)
//! - Motor shield (the one owner of latch and PWM, shared by all motors)
//! - DC motor and stepper motor drivers
//!
//! # Usage
//!
//! ```ignore
//! let shield: MotorShield<CriticalSectionRawMutex, _, _> =
//!     MotorShield::new(latch_pins, pwm_slots, ShieldConfig::avr())?;
//!
//! let mut pump = DcMotor::new(&shield, MotorPort::M3);
//! pump.set_speed(200);
//! pump.run(Command::Forward);
//!
//! let mut stepper = Stepper::new(&shield, 200, StepperPort::Port1)?;
//! stepper.set_speed(60)?;
//! stepper.step(&mut delay, 100, Direction::Forward, StepStyle::Double);
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod latch;
pub mod motor;
pub mod pwm;
pub mod shield;
pub mod stepper;

#[cfg(test)]
mod mock;

pub use latch::{LatchDriver, LatchPins};
pub use motor::DcMotor;
pub use pwm::{PwmAllocator, PwmSlot};
pub use shield::MotorShield;
pub use stepper::Stepper;
