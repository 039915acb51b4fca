//! Stepper driver implementations

pub mod bipolar;

pub use bipolar::Stepper;
