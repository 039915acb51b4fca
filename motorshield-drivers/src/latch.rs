//! 74HCT595 latch driver
//!
//! The shield's eight half-bridge direction inputs hang off one serial-in,
//! parallel-out shift register. A write shifts all eight bits in (MSB
//! first, sampled on the rising clock edge) and then pulses the storage
//! latch, so the outputs jump from the old byte to the new one in a single
//! edge. Nothing downstream ever sees a half-shifted pattern.
//!
//! The output enable line is active low.

use motorshield_hal::OutputPin;

/// The four control lines of the shift register
pub struct LatchPins<P> {
    /// Serial data in (DS)
    pub data: P,
    /// Shift clock (SHCP)
    pub clock: P,
    /// Storage latch clock (STCP)
    pub latch: P,
    /// Output enable (OE, active low)
    pub enable: P,
}

/// Owner of the latch byte and the lines that push it out
pub struct LatchDriver<P> {
    pins: LatchPins<P>,
    /// Last byte pushed to the outputs
    state: u8,
    enabled: bool,
    /// Number of completed pushes
    writes: u32,
}

impl<P: OutputPin> LatchDriver<P> {
    /// Take the control lines, keeping the outputs disabled
    pub fn new(mut pins: LatchPins<P>) -> Self {
        pins.enable.set_high();
        pins.latch.set_low();
        pins.clock.set_low();
        pins.data.set_low();

        Self {
            pins,
            state: 0,
            enabled: false,
            writes: 0,
        }
    }

    /// Clear every output, then turn the outputs on
    ///
    /// The zero byte is latched before OE goes low so the bridges never
    /// come up in whatever state the register powered up in.
    pub fn enable(&mut self) {
        self.write(0);
        self.pins.enable.set_low();
        self.enabled = true;
    }

    /// Check if the outputs have been enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last byte pushed to the outputs
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Number of completed pushes since construction
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Replace the whole byte and push it out
    pub fn write(&mut self, state: u8) {
        self.state = state;
        self.push();
    }

    /// Clear then set bits, and push the resulting byte
    ///
    /// Returns the new byte.
    pub fn modify(&mut self, clear: u8, set: u8) -> u8 {
        let state = (self.state & !clear) | set;
        self.write(state);
        state
    }

    /// Give the control lines back
    pub fn release(self) -> LatchPins<P> {
        self.pins
    }

    fn push(&mut self) {
        let pins = &mut self.pins;

        pins.latch.set_low();
        pins.data.set_low();

        for bit in (0..8).rev() {
            pins.clock.set_low();
            pins.data.set_state(self.state & (1 << bit) != 0);
            pins.clock.set_high();
        }

        pins.latch.set_high();
        self.writes = self.writes.wrapping_add(1);

        trace!("latch <- {=u8:#x}", self.state);
    }
}
