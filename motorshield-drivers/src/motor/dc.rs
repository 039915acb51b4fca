//! DC motor driver
//!
//! One motor port is a half-bridge pair: the two latch bits select the
//! direction and the port's PWM channel sets the speed.
//!
//! ```ignore
//! let mut motor = DcMotor::new(&shield, MotorPort::M2);
//! motor.set_speed(180);
//! motor.run(Command::Forward);
//! // ...
//! motor.run(Command::Release);
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use motorshield_core::config::PwmFrequency;
use motorshield_core::layout::MotorPort;
use motorshield_core::traits::{Command, DcMotorDriver};
use motorshield_hal::{OutputPin, PwmOutput};

use crate::shield::MotorShield;

/// DC motor on one shield port
pub struct DcMotor<'a, M: RawMutex, P, W> {
    shield: &'a MotorShield<M, P, W>,
    port: MotorPort,
    /// Last speed set (0-255)
    speed: u8,
    /// Last command applied
    command: Command,
}

impl<'a, M, P, W> DcMotor<'a, M, P, W>
where
    M: RawMutex,
    P: OutputPin,
    W: PwmOutput,
{
    /// Claim a motor port at the shield's DC motor frequency
    pub fn new(shield: &'a MotorShield<M, P, W>, port: MotorPort) -> Self {
        let frequency = shield.config().dc_motor_rate;
        Self::with_frequency(shield, port, frequency)
    }

    /// Claim a motor port at an explicit PWM frequency
    ///
    /// The motor starts released with 0% duty.
    pub fn with_frequency(
        shield: &'a MotorShield<M, P, W>,
        port: MotorPort,
        frequency: PwmFrequency,
    ) -> Self {
        shield.ensure_enabled();
        shield.update_latch(port.mask(), 0);
        shield.allocate(port.pwm_channel(), frequency, 0);

        debug!("DC motor M{} ready at {} Hz", port.number(), frequency.hz());

        Self {
            shield,
            port,
            speed: 0,
            command: Command::Release,
        }
    }

    /// Port this motor is wired to
    pub fn port(&self) -> MotorPort {
        self.port
    }

    /// Last command applied
    pub fn command(&self) -> Command {
        self.command
    }

    /// Latch bits for a command
    fn latch_bits(&self, cmd: Command) -> u8 {
        match cmd {
            Command::Forward => self.port.a_mask(),
            Command::Backward => self.port.b_mask(),
            Command::Brake => self.port.mask(),
            Command::Release => 0,
        }
    }
}

impl<M, P, W> DcMotorDriver for DcMotor<'_, M, P, W>
where
    M: RawMutex,
    P: OutputPin,
    W: PwmOutput,
{
    fn run(&mut self, cmd: Command) {
        self.shield.update_latch(self.port.mask(), self.latch_bits(cmd));
        self.command = cmd;
        debug!("DC motor M{}: {}", self.port.number(), cmd);
    }

    fn set_speed(&mut self, speed: u8) {
        self.shield.set_duty(self.port.pwm_channel(), speed);
        self.speed = speed;
    }

    fn speed(&self) -> u8 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{shield, Board, Line, MockPin, PwmBank, TestShield};
    use crate::pwm::PwmSlot;
    use core::cell::RefCell;
    use motorshield_core::config::ShieldConfig;
    use motorshield_core::layout::PwmChannel;
    use motorshield_core::traits::Direction;

    #[test]
    fn test_new_enables_and_allocates() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());

        let motor = DcMotor::new(&shield, MotorPort::M3);

        assert!(shield.is_enabled());
        assert_eq!(motor.speed(), 0);
        assert_eq!(motor.command(), Command::Release);
        assert_eq!(shield.frequency(PwmChannel::Ch2), Some(PwmFrequency::MOTOR34_8KHZ));
        assert_eq!(bank.borrow().duty[2], 0);
        assert_eq!(board.borrow().outputs(), 0);
    }

    #[test]
    fn test_with_frequency_overrides_default() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());

        let _motor = DcMotor::with_frequency(&shield, MotorPort::M1, PwmFrequency::MOTOR12_1KHZ);

        assert_eq!(bank.borrow().frequency[0], Some(1_000));
    }

    #[test]
    fn test_motors_in_one_group_share_frequency() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());

        let _m1 = DcMotor::with_frequency(&shield, MotorPort::M1, PwmFrequency::MOTOR12_1KHZ);
        let _m2 = DcMotor::new(&shield, MotorPort::M2);

        // M2 retuned the M1/M2 timer to the DC default
        assert_eq!(shield.frequency(PwmChannel::Ch0), Some(PwmFrequency(8_000)));
        assert_eq!(shield.frequency(PwmChannel::Ch1), Some(PwmFrequency(8_000)));
        assert_eq!(bank.borrow().frequency[0], Some(8_000));
    }

    #[test]
    fn test_on_off_channel_follows_speed() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let [ch0, ch1, _, ch3] = PwmBank::hardware_slots(&bank);
        let slots = [
            ch0,
            ch1,
            PwmSlot::OnOff(MockPin::new(&board, Line::Fallback(2))),
            ch3,
        ];
        let shield: TestShield =
            MotorShield::new(Board::latch_pins(&board), slots, ShieldConfig::avr()).unwrap();
        assert!(shield.is_degraded(PwmChannel::Ch2));

        let mut motor = DcMotor::new(&shield, MotorPort::M3);
        motor.run(Command::Forward);
        assert!(!board.borrow().level(Line::Fallback(2)));

        motor.set_speed(200);
        assert!(board.borrow().level(Line::Fallback(2)));
        assert_eq!(shield.duty(PwmChannel::Ch2), 200);

        motor.set_speed(50);
        assert!(!board.borrow().level(Line::Fallback(2)));
        assert_eq!(motor.speed(), 50);
    }

    #[test]
    fn test_run_from_direction() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());
        let mut motor = DcMotor::new(&shield, MotorPort::M2);

        motor.run(Direction::Forward.into());
        assert_eq!(board.borrow().outputs(), MotorPort::M2.a_mask());

        motor.run(Direction::Forward.opposite().into());
        assert_eq!(board.borrow().outputs(), MotorPort::M2.b_mask());
        assert_eq!(motor.command(), Command::Backward);
    }

    #[test]
    fn test_run_commands_set_bit_pair() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());
        let mut motor = DcMotor::new(&shield, MotorPort::M1);

        // M1 is A = bit 2, B = bit 3
        motor.run(Command::Forward);
        assert_eq!(board.borrow().outputs(), 0b0000_0100);

        motor.run(Command::Backward);
        assert_eq!(board.borrow().outputs(), 0b0000_1000);

        motor.run(Command::Brake);
        assert_eq!(board.borrow().outputs(), 0b0000_1100);

        motor.run(Command::Release);
        assert_eq!(board.borrow().outputs(), 0);
        assert_eq!(motor.command(), Command::Release);
    }

    #[test]
    fn test_set_speed_only_touches_own_channel() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());
        let mut m2 = DcMotor::new(&shield, MotorPort::M2);
        let mut m4 = DcMotor::new(&shield, MotorPort::M4);
        let writes = shield.latch_writes();

        m2.set_speed(100);
        m4.set_speed(250);

        assert_eq!(bank.borrow().duty, [0, 100, 0, 250]);
        assert_eq!(m2.speed(), 100);
        // Speed changes never touch the latch
        assert_eq!(shield.latch_writes(), writes);
    }

    #[test]
    fn test_release_keeps_speed() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());
        let mut motor = DcMotor::new(&shield, MotorPort::M4);

        motor.set_speed(150);
        let duty_writes = bank.borrow().duty_writes;
        motor.run(Command::Forward);
        motor.run(Command::Release);

        // Direction changes never touch the PWM
        assert_eq!(bank.borrow().duty_writes, duty_writes);
        assert_eq!(bank.borrow().duty[3], 150);
        assert_eq!(board.borrow().outputs(), 0);

        motor.run(Command::Backward);
        assert_eq!(board.borrow().outputs(), 1 << 6);
        assert_eq!(bank.borrow().duty[3], 150);
    }

    #[test]
    fn test_interleaved_motors_preserve_each_others_bits() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());
        let mut m1 = DcMotor::new(&shield, MotorPort::M1);
        let mut m3 = DcMotor::new(&shield, MotorPort::M3);

        let m1_mask = MotorPort::M1.mask();
        let m3_mask = MotorPort::M3.mask();

        for i in 0..10 {
            if i % 2 == 0 {
                m1.run(Command::Forward);
                m3.run(Command::Backward);
            } else {
                m3.run(Command::Forward);
                m1.run(Command::Backward);
            }

            let out = board.borrow().outputs();
            let (m1_bits, m3_bits) = if i % 2 == 0 {
                (MotorPort::M1.a_mask(), MotorPort::M3.b_mask())
            } else {
                (MotorPort::M1.b_mask(), MotorPort::M3.a_mask())
            };
            assert_eq!(out & m1_mask, m1_bits);
            assert_eq!(out & m3_mask, m3_bits);
            assert_eq!(out & !(m1_mask | m3_mask), 0);
        }
    }

    #[test]
    fn test_second_motor_does_not_reset_first() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let shield = shield(&board, &bank, ShieldConfig::avr());

        let mut m1 = DcMotor::new(&shield, MotorPort::M1);
        m1.run(Command::Forward);

        let _m2 = DcMotor::new(&shield, MotorPort::M2);

        assert_eq!(board.borrow().outputs(), MotorPort::M1.a_mask());
    }
}
