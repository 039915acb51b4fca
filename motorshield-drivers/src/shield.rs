//! The shared shield
//!
//! Every motor on the board writes to the same latch byte and the same bank
//! of PWM channels. `MotorShield` is the single owner of both; motors hold
//! a shared reference and request bit-level changes through it, so no motor
//! ever caches the byte. Each request runs as one lock section of the raw
//! mutex chosen by the integrator:
//!
//! - `CriticalSectionRawMutex` when motors are driven from more than one
//!   task or interrupt
//! - `NoopRawMutex` for single-context use

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use motorshield_core::config::{ConfigError, PwmFrequency, ShieldConfig};
use motorshield_core::layout::{PwmChannel, PWM_CHANNELS};
use motorshield_hal::{OutputPin, PwmOutput};

use crate::latch::{LatchDriver, LatchPins};
use crate::pwm::{PwmAllocator, PwmSlot};

/// Hardware behind the lock
pub(crate) struct ShieldHw<P, W> {
    pub(crate) latch: LatchDriver<P>,
    pub(crate) pwm: PwmAllocator<W, P>,
}

/// Latch and PWM resources shared by all motors on one shield
pub struct MotorShield<M: RawMutex, P, W> {
    hw: Mutex<M, RefCell<ShieldHw<P, W>>>,
    config: ShieldConfig,
}

impl<M, P, W> MotorShield<M, P, W>
where
    M: RawMutex,
    P: OutputPin,
    W: PwmOutput,
{
    /// Take ownership of the latch lines and PWM outputs
    ///
    /// The outputs stay disabled until the first motor is constructed or
    /// [`enable`](Self::enable) is called.
    pub fn new(
        latch_pins: LatchPins<P>,
        pwm_slots: [PwmSlot<W, P>; PWM_CHANNELS],
        config: ShieldConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let hw = ShieldHw {
            latch: LatchDriver::new(latch_pins),
            pwm: PwmAllocator::new(pwm_slots, config.shared_timebase),
        };

        debug!(
            "Shield created (microsteps {}, shared timebase {})",
            config.microsteps.per_step(),
            config.shared_timebase
        );

        Ok(Self {
            hw: Mutex::new(RefCell::new(hw)),
            config,
        })
    }

    /// Configuration the shield was built with
    pub fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Clear the latch and turn the outputs on
    ///
    /// Clears the bits of every motor already running. Motor constructors
    /// use [`ensure_enabled`](Self::ensure_enabled) instead.
    pub fn enable(&self) {
        self.with_hw(|hw| hw.latch.enable());
        info!("Shield outputs enabled");
    }

    /// Enable the outputs unless they already are
    ///
    /// Returns `true` if this call enabled them.
    pub fn ensure_enabled(&self) -> bool {
        let enabled = self.with_hw(|hw| {
            if hw.latch.is_enabled() {
                false
            } else {
                hw.latch.enable();
                true
            }
        });
        if enabled {
            info!("Shield outputs enabled");
        }
        enabled
    }

    /// Check if the outputs are enabled
    pub fn is_enabled(&self) -> bool {
        self.with_hw(|hw| hw.latch.is_enabled())
    }

    /// Last latch byte pushed to the board
    pub fn latch_state(&self) -> u8 {
        self.with_hw(|hw| hw.latch.state())
    }

    /// Number of latch pushes so far
    pub fn latch_writes(&self) -> u32 {
        self.with_hw(|hw| hw.latch.write_count())
    }

    /// Clear then set latch bits as one read-modify-write
    ///
    /// Returns the new latch byte.
    pub fn update_latch(&self, clear: u8, set: u8) -> u8 {
        self.with_hw(|hw| hw.latch.modify(clear, set))
    }

    /// Set one channel's duty (0-255)
    pub fn set_duty(&self, channel: PwmChannel, duty: u8) {
        self.with_hw(|hw| hw.pwm.set_duty(channel, duty));
    }

    /// Last duty written to a channel
    pub fn duty(&self, channel: PwmChannel) -> u8 {
        self.with_hw(|hw| hw.pwm.duty(channel))
    }

    /// Frequency of the timer a channel runs from
    pub fn frequency(&self, channel: PwmChannel) -> Option<PwmFrequency> {
        self.with_hw(|hw| hw.pwm.frequency(channel))
    }

    /// Check if a channel is in on/off fallback mode
    pub fn is_degraded(&self, channel: PwmChannel) -> bool {
        self.with_hw(|hw| hw.pwm.is_degraded(channel))
    }

    pub(crate) fn allocate(&self, channel: PwmChannel, frequency: PwmFrequency, duty: u8) {
        self.with_hw(|hw| hw.pwm.allocate(channel, frequency, duty));
    }

    /// Run `f` with exclusive access to latch and PWM
    pub(crate) fn with_hw<R>(&self, f: impl FnOnce(&mut ShieldHw<P, W>) -> R) -> R {
        self.hw.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
