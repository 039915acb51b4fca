//! Configuration types
//!
//! The platform-specific timer settings of the shield are resolved once at
//! startup into a [`ShieldConfig`] and injected into the drivers.

mod frequency;
mod shield;

pub use frequency::PwmFrequency;
pub use shield::{ConfigError, Microsteps, ShieldConfig};
