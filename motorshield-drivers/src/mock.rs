//! Host-side stand-ins for the shield hardware
//!
//! `Board` simulates the 74HC595 at the pin level: bits are clocked in on
//! the rising shift-clock edge and only reach the outputs on the rising
//! latch edge. Tests observe the outputs and the history of latched bytes,
//! never the shift register itself.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal::delay::DelayNs;
use heapless::Vec;
use motorshield_core::config::ShieldConfig;
use motorshield_core::layout::PWM_CHANNELS;
use motorshield_hal::{OutputPin, PwmOutput};

use crate::latch::LatchPins;
use crate::pwm::PwmSlot;
use crate::shield::MotorShield;

const HISTORY: usize = 1024;

/// A control line on the simulated board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    Latch,
    Enable,
    /// On/off stand-in for a PWM channel
    Fallback(usize),
}

/// Simulated shift register plus the fallback enable pins
pub struct Board {
    data: bool,
    clock: bool,
    latch: bool,
    enable: bool,
    fallback: [bool; PWM_CHANNELS],
    shift: u8,
    outputs: u8,
    shift_edges: u32,
    latched: Vec<u8, HISTORY>,
    outputs_at_enable: Option<u8>,
}

impl Board {
    pub fn new() -> Self {
        Self {
            data: false,
            clock: false,
            latch: false,
            enable: false,
            fallback: [false; PWM_CHANNELS],
            shift: 0,
            outputs: 0,
            shift_edges: 0,
            latched: Vec::new(),
            outputs_at_enable: None,
        }
    }

    /// Power-up garbage in the register and on the outputs
    pub fn preload(&mut self, value: u8) {
        self.shift = value;
        self.outputs = value;
    }

    pub fn latch_pins(board: &RefCell<Board>) -> LatchPins<MockPin<'_>> {
        LatchPins {
            data: MockPin::new(board, Line::Data),
            clock: MockPin::new(board, Line::Clock),
            latch: MockPin::new(board, Line::Latch),
            enable: MockPin::new(board, Line::Enable),
        }
    }

    pub fn level(&self, line: Line) -> bool {
        match line {
            Line::Data => self.data,
            Line::Clock => self.clock,
            Line::Latch => self.latch,
            Line::Enable => self.enable,
            Line::Fallback(n) => self.fallback[n],
        }
    }

    /// Current parallel outputs
    pub fn outputs(&self) -> u8 {
        self.outputs
    }

    /// Every byte that reached the outputs, oldest first
    pub fn latched(&self) -> &[u8] {
        &self.latched
    }

    pub fn shift_edges(&self) -> u32 {
        self.shift_edges
    }

    /// Outputs at the moment OE was pulled low
    pub fn outputs_at_enable(&self) -> Option<u8> {
        self.outputs_at_enable
    }

    fn drive(&mut self, line: Line, high: bool) {
        let was = self.level(line);
        match line {
            Line::Data => self.data = high,
            Line::Clock => self.clock = high,
            Line::Latch => self.latch = high,
            Line::Enable => self.enable = high,
            Line::Fallback(n) => self.fallback[n] = high,
        }

        let rising = !was && high;
        let falling = was && !high;
        match line {
            Line::Clock if rising => {
                self.shift = (self.shift << 1) | u8::from(self.data);
                self.shift_edges += 1;
            }
            Line::Latch if rising => {
                self.outputs = self.shift;
                self.latched
                    .push(self.outputs)
                    .expect("latch history full");
            }
            Line::Enable if falling => {
                self.outputs_at_enable = Some(self.outputs);
            }
            _ => {}
        }
    }
}

/// A pin wired to the simulated board
pub struct MockPin<'a> {
    board: &'a RefCell<Board>,
    line: Line,
}

impl<'a> MockPin<'a> {
    pub fn new(board: &'a RefCell<Board>, line: Line) -> Self {
        Self { board, line }
    }
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        self.board.borrow_mut().drive(self.line, true);
    }

    fn set_low(&mut self) {
        self.board.borrow_mut().drive(self.line, false);
    }

    fn is_set_high(&self) -> bool {
        self.board.borrow().level(self.line)
    }
}

/// Duty and frequency seen by each simulated PWM channel
#[derive(Default)]
pub struct PwmBank {
    pub duty: [u8; PWM_CHANNELS],
    pub frequency: [Option<u32>; PWM_CHANNELS],
    pub duty_writes: u32,
}

impl PwmBank {
    /// Four hardware slots backed by this bank
    pub fn hardware_slots(
        bank: &RefCell<PwmBank>,
    ) -> [PwmSlot<MockPwm<'_>, MockPin<'_>>; PWM_CHANNELS] {
        [0, 1, 2, 3].map(|channel| PwmSlot::Hardware(MockPwm::new(bank, channel)))
    }
}

/// A PWM channel recording into a [`PwmBank`]
pub struct MockPwm<'a> {
    bank: &'a RefCell<PwmBank>,
    channel: usize,
}

impl<'a> MockPwm<'a> {
    pub fn new(bank: &'a RefCell<PwmBank>, channel: usize) -> Self {
        Self { bank, channel }
    }
}

impl PwmOutput for MockPwm<'_> {
    fn set_frequency(&mut self, hz: u32) {
        self.bank.borrow_mut().frequency[self.channel] = Some(hz);
    }

    fn set_duty(&mut self, duty: u8) {
        let mut bank = self.bank.borrow_mut();
        bank.duty[self.channel] = duty;
        bank.duty_writes += 1;
    }

    fn duty(&self) -> u8 {
        self.bank.borrow().duty[self.channel]
    }
}

/// Delay that only adds up what it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    pub total_us: u64,
    pub calls: u32,
    pub last_us: Option<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_us += u64::from(ns / 1_000);
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
        self.calls += 1;
        self.last_us = Some(us);
    }
}

/// Shield wired entirely to mocks
pub type TestShield<'a> = MotorShield<NoopRawMutex, MockPin<'a>, MockPwm<'a>>;

/// Build a shield on the simulated board with four hardware PWM channels
pub fn shield<'a>(
    board: &'a RefCell<Board>,
    bank: &'a RefCell<PwmBank>,
    config: ShieldConfig,
) -> TestShield<'a> {
    MotorShield::new(Board::latch_pins(board), PwmBank::hardware_slots(bank), config)
        .expect("valid test config")
}
