//! Board-agnostic core logic for the motor shield
//!
//! This crate contains everything that does not touch hardware:
//!
//! - The user vocabulary (commands, directions, stepping styles)
//! - Driver traits for DC and stepper motors
//! - The fixed latch bit layout of the board
//! - Configuration types and platform presets
//! - Stepping tables, the stepper phase state machine and step timing math

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod layout;
pub mod stepping;
pub mod traits;
