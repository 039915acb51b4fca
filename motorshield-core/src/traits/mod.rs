//! Motor driver traits
//!
//! These traits define the interface between application code and the
//! shield drivers.

pub mod motor;
pub mod stepper;

pub use motor::{Command, DcMotorDriver};
pub use stepper::{Direction, StepStyle, StepperDriver, StepperError};
