//! Bipolar stepper on one shield stepper port
//!
//! Coil 1 is the port's first motor output and coil 2 its second. Each
//! call to `onestep` moves the shared phase index, looks up the lines and
//! duties for the new phase and commits them in one lock section, so the
//! PWM duties and latch bits of a microstep are never observed half
//! applied by another motor.
//!
//! ```ignore
//! let mut stepper = Stepper::new(&shield, 200, StepperPort::Port2)?;
//! stepper.set_speed(30)?;
//! stepper.step(&mut delay, 400, Direction::Forward, StepStyle::Interleave);
//! stepper.release();
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use motorshield_core::config::Microsteps;
use motorshield_core::layout::StepperPort;
use motorshield_core::stepping::timing::substeps;
use motorshield_core::stepping::{CoilDrive, StepPhase, StepTiming};
use motorshield_core::traits::{Direction, StepStyle, StepperDriver, StepperError};
use motorshield_hal::{OutputPin, PwmOutput, MAX_DUTY};

use crate::shield::MotorShield;

/// Stepper motor on one of the two stepper ports
pub struct Stepper<'a, M: RawMutex, P, W> {
    shield: &'a MotorShield<M, P, W>,
    port: StepperPort,
    /// Full steps per mechanical revolution
    revsteps: u16,
    phase: StepPhase,
    timing: StepTiming,
}

impl<'a, M, P, W> Stepper<'a, M, P, W>
where
    M: RawMutex,
    P: OutputPin,
    W: PwmOutput,
{
    /// Claim a stepper port
    ///
    /// Both coils start de-energized with their bridges fully enabled.
    /// No delay is inserted between steps until a speed is set.
    pub fn new(
        shield: &'a MotorShield<M, P, W>,
        revsteps: u16,
        port: StepperPort,
    ) -> Result<Self, StepperError> {
        if revsteps == 0 {
            return Err(StepperError::InvalidConfig);
        }

        let config = shield.config();
        let frequency = config.stepper_rate(port);
        let (coil_1, coil_2) = port.pwm_channels();

        shield.ensure_enabled();
        shield.with_hw(|hw| {
            hw.latch.modify(port.mask(), 0);
            hw.pwm.allocate(coil_1, frequency, MAX_DUTY);
            hw.pwm.allocate(coil_2, frequency, MAX_DUTY);
        });

        debug!(
            "Stepper {} ready: {} steps/rev at {} Hz",
            port.number(),
            revsteps,
            frequency.hz()
        );

        Ok(Self {
            shield,
            port,
            revsteps,
            phase: StepPhase::new(config.microsteps),
            timing: StepTiming::new(),
        })
    }

    /// Port this stepper is wired to
    pub fn port(&self) -> StepperPort {
        self.port
    }

    /// Full steps per revolution
    pub fn revsteps(&self) -> u16 {
        self.revsteps
    }

    /// Microstep resolution of the phase index
    pub fn microsteps(&self) -> Microsteps {
        self.phase.microsteps()
    }

    /// Microseconds per full step (0 until a speed is set)
    pub fn us_per_step(&self) -> u32 {
        self.timing.us_per_step()
    }

    /// Position in a style's table
    pub fn position(&self, style: StepStyle) -> u16 {
        self.phase.position(style)
    }

    /// Write duties and latch bits for one phase
    fn apply(&self, drive: CoilDrive) {
        let port = self.port;
        let (coil_1, coil_2) = port.pwm_channels();

        self.shield.with_hw(|hw| {
            hw.pwm.set_duty(coil_1, drive.duty_1);
            hw.pwm.set_duty(coil_2, drive.duty_2);
            hw.latch.modify(port.mask(), port.latch_bits(drive.lines));
        });
    }
}

impl<M, P, W> StepperDriver for Stepper<'_, M, P, W>
where
    M: RawMutex,
    P: OutputPin,
    W: PwmOutput,
{
    fn set_speed(&mut self, rpm: u16) -> Result<(), StepperError> {
        self.timing.set_rpm(self.revsteps, rpm)?;
        debug!(
            "Stepper {}: {} rpm, {} us/step",
            self.port.number(),
            rpm,
            self.timing.us_per_step()
        );
        Ok(())
    }

    fn onestep(&mut self, dir: Direction, style: StepStyle) -> u16 {
        let index = self.phase.advance(dir, style);
        self.apply(self.phase.drive(style));

        trace!("Stepper {}: {} {} -> {}", self.port.number(), dir, style, index);
        index
    }

    fn step<D: DelayNs>(&mut self, delay: &mut D, steps: u16, dir: Direction, style: StepStyle) {
        let substeps = substeps(style, self.phase.microsteps());

        for _ in 0..steps {
            self.onestep(dir, style);

            let us = self.timing.next_delay_us(substeps);
            if us > 0 {
                delay.delay_us(us);
            }
        }
    }

    fn release(&mut self) {
        self.apply(CoilDrive::RELEASED);
        debug!("Stepper {} released", self.port.number());
    }

    fn current_step(&self) -> u16 {
        self.phase.index()
    }
}
