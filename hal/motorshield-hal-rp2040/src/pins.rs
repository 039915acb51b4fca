//! Latch control line bring-up

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use motorshield_drivers::LatchPins;

use crate::gpio::RpOutput;

/// The four 74HCT595 control lines of the shield
///
/// `OE` is active low, so it comes up high: the outputs stay off until the
/// driver has latched a known byte.
///
/// ```ignore
/// let pins = ShieldPins::new(p.PIN_8, p.PIN_4, p.PIN_12, p.PIN_7);
/// let shield = MotorShield::new(pins.into(), slots, ShieldConfig::avr())?;
/// ```
pub struct ShieldPins<'d> {
    /// Serial data (DS)
    pub data: RpOutput<'d>,
    /// Shift clock (SHCP)
    pub clock: RpOutput<'d>,
    /// Storage latch clock (STCP)
    pub latch: RpOutput<'d>,
    /// Output enable (OE)
    pub enable: RpOutput<'d>,
}

impl<'d> ShieldPins<'d> {
    /// Configure the control lines
    pub fn new(
        data: Peri<'d, impl Pin>,
        clock: Peri<'d, impl Pin>,
        latch: Peri<'d, impl Pin>,
        enable: Peri<'d, impl Pin>,
    ) -> Self {
        Self {
            data: RpOutput::new(Output::new(data, Level::Low)),
            clock: RpOutput::new(Output::new(clock, Level::Low)),
            latch: RpOutput::new(Output::new(latch, Level::Low)),
            enable: RpOutput::new(Output::new(enable, Level::High)),
        }
    }
}

impl<'d> From<ShieldPins<'d>> for LatchPins<RpOutput<'d>> {
    fn from(pins: ShieldPins<'d>) -> Self {
        LatchPins {
            data: pins.data,
            clock: pins.clock,
            latch: pins.latch,
            enable: pins.enable,
        }
    }
}
