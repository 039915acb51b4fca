//! Stepper sequencing
//!
//! - [`tables`]: coil patterns and microstep duty curves
//! - [`phase`]: the phase index state machine shared by every style
//! - [`timing`]: RPM to per-step delay conversion

pub mod phase;
pub mod tables;
pub mod timing;

pub use phase::{CoilDrive, StepPhase};
pub use timing::StepTiming;
