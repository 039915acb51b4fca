//! Motor driver implementations
//!
//! Stepper motors live in [`crate::stepper`]; this module holds the
//! half-bridge DC motor.

pub mod dc;

pub use dc::DcMotor;
