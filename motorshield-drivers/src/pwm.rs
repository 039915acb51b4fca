//! PWM channel allocator
//!
//! Binds the four logical channels to whatever the board offers. A channel
//! without a hardware PWM output falls back to a plain digital pin that is
//! either fully on or fully off; the motor still runs, just without speed
//! control.
//!
//! Channels in one group (M1/M2 or M3/M4) run from the same timer, and on
//! boards with a shared timebase all four do. Their frequency is tracked
//! per timer, not per channel.

use motorshield_core::config::PwmFrequency;
use motorshield_core::layout::{PwmChannel, CHANNEL_GROUPS, PWM_CHANNELS};
use motorshield_hal::{OutputPin, PwmOutput};

/// Duty above which an on/off channel is driven high
pub const ON_OFF_THRESHOLD: u8 = 127;

/// What backs a logical channel
pub enum PwmSlot<W, P> {
    /// A real PWM output
    Hardware(W),
    /// A digital pin, high when duty > 127
    OnOff(P),
}

impl<W: PwmOutput, P: OutputPin> PwmSlot<W, P> {
    /// Check if the slot is an on/off fallback
    pub fn is_degraded(&self) -> bool {
        matches!(self, PwmSlot::OnOff(_))
    }

    fn set_frequency(&mut self, hz: u32) {
        if let PwmSlot::Hardware(pwm) = self {
            pwm.set_frequency(hz);
        }
    }

    fn set_duty(&mut self, duty: u8) {
        match self {
            PwmSlot::Hardware(pwm) => pwm.set_duty(duty),
            PwmSlot::OnOff(pin) => pin.set_state(duty > ON_OFF_THRESHOLD),
        }
    }
}

/// Four logical PWM channels with their timer frequencies and last duty
pub struct PwmAllocator<W, P> {
    slots: [PwmSlot<W, P>; PWM_CHANNELS],
    /// Rate of each timer; only index 0 is used with a shared timebase
    frequency: [Option<PwmFrequency>; CHANNEL_GROUPS],
    duty: [u8; PWM_CHANNELS],
    shared_timebase: bool,
}

impl<W: PwmOutput, P: OutputPin> PwmAllocator<W, P> {
    /// Bind the channels, in index order, and turn them all off
    ///
    /// With `shared_timebase` all four channels share one frequency.
    pub fn new(slots: [PwmSlot<W, P>; PWM_CHANNELS], shared_timebase: bool) -> Self {
        let mut allocator = Self {
            slots,
            frequency: [None; CHANNEL_GROUPS],
            duty: [0; PWM_CHANNELS],
            shared_timebase,
        };

        for channel in PwmChannel::ALL {
            if allocator.is_degraded(channel) {
                warn!("PWM {} has no hardware output, using on/off drive", channel);
            }
            allocator.slots[channel.index()].set_duty(0);
        }

        allocator
    }

    /// Timer a channel runs from
    fn timer(&self, channel: PwmChannel) -> usize {
        if self.shared_timebase {
            0
        } else {
            channel.group().index()
        }
    }

    /// Claim a channel for a motor
    ///
    /// Applies the base frequency and the motor's initial duty. The
    /// frequency belongs to the channel's timer, so every channel on that
    /// timer is retuned; the last allocation wins.
    pub fn allocate(&mut self, channel: PwmChannel, frequency: PwmFrequency, duty: u8) {
        let timer = self.timer(channel);

        if let Some(current) = self.frequency[timer] {
            if current != frequency {
                warn!(
                    "PWM {} retunes its timer from {} Hz to {} Hz",
                    channel,
                    current.hz(),
                    frequency.hz()
                );
            }
        }

        for sibling in PwmChannel::ALL {
            if self.timer(sibling) == timer {
                self.slots[sibling.index()].set_frequency(frequency.hz());
            }
        }
        self.frequency[timer] = Some(frequency);
        self.set_duty(channel, duty);

        debug!("PWM {} allocated at {} Hz", channel, frequency.hz());
    }

    /// Set one channel's duty, leaving the others untouched
    pub fn set_duty(&mut self, channel: PwmChannel, duty: u8) {
        let i = channel.index();
        self.slots[i].set_duty(duty);
        self.duty[i] = duty;
    }

    /// Last duty written to a channel
    pub fn duty(&self, channel: PwmChannel) -> u8 {
        self.duty[channel.index()]
    }

    /// Frequency of the channel's timer, if any channel on it was allocated
    pub fn frequency(&self, channel: PwmChannel) -> Option<PwmFrequency> {
        self.frequency[self.timer(channel)]
    }

    /// Check if a channel is running in on/off fallback mode
    pub fn is_degraded(&self, channel: PwmChannel) -> bool {
        self.slots[channel.index()].is_degraded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Board, Line, MockPin, MockPwm, PwmBank};
    use core::cell::RefCell;

    #[test]
    fn test_new_turns_channels_off() {
        let bank = RefCell::new(PwmBank::default());
        bank.borrow_mut().duty = [9; PWM_CHANNELS];

        let pwm: PwmAllocator<MockPwm, MockPin> =
            PwmAllocator::new(PwmBank::hardware_slots(&bank), false);

        assert_eq!(bank.borrow().duty, [0; PWM_CHANNELS]);
        assert!(PwmChannel::ALL.iter().all(|&ch| pwm.frequency(ch).is_none()));
        assert!(PwmChannel::ALL.iter().all(|&ch| !pwm.is_degraded(ch)));
    }

    #[test]
    fn test_allocate_sets_frequency_and_duty() {
        let bank = RefCell::new(PwmBank::default());
        let mut pwm: PwmAllocator<MockPwm, MockPin> =
            PwmAllocator::new(PwmBank::hardware_slots(&bank), false);

        pwm.allocate(PwmChannel::Ch2, PwmFrequency::MOTOR34_8KHZ, 255);

        assert_eq!(pwm.frequency(PwmChannel::Ch2), Some(PwmFrequency::MOTOR34_8KHZ));
        assert_eq!(pwm.duty(PwmChannel::Ch2), 255);
        assert_eq!(bank.borrow().frequency[2], Some(8_000));
        assert_eq!(bank.borrow().duty, [0, 0, 255, 0]);
    }

    #[test]
    fn test_group_shares_one_frequency() {
        let bank = RefCell::new(PwmBank::default());
        let mut pwm: PwmAllocator<MockPwm, MockPin> =
            PwmAllocator::new(PwmBank::hardware_slots(&bank), false);

        pwm.allocate(PwmChannel::Ch0, PwmFrequency::MOTOR12_1KHZ, 40);
        pwm.allocate(PwmChannel::Ch1, PwmFrequency::MOTOR12_8KHZ, 0);

        // Last allocation retunes the M1/M2 timer for both channels
        assert_eq!(pwm.frequency(PwmChannel::Ch0), Some(PwmFrequency::MOTOR12_8KHZ));
        assert_eq!(pwm.frequency(PwmChannel::Ch1), Some(PwmFrequency::MOTOR12_8KHZ));
        assert_eq!(bank.borrow().frequency, [Some(8_000), Some(8_000), None, None]);
        assert_eq!(pwm.duty(PwmChannel::Ch0), 40);

        // The other group keeps its own timer
        pwm.allocate(PwmChannel::Ch3, PwmFrequency::MOTOR34_64KHZ, 0);
        assert_eq!(pwm.frequency(PwmChannel::Ch2), Some(PwmFrequency::MOTOR34_64KHZ));
        assert_eq!(pwm.frequency(PwmChannel::Ch0), Some(PwmFrequency::MOTOR12_8KHZ));
    }

    #[test]
    fn test_shared_timebase_spans_all_channels() {
        let bank = RefCell::new(PwmBank::default());
        let mut pwm: PwmAllocator<MockPwm, MockPin> =
            PwmAllocator::new(PwmBank::hardware_slots(&bank), true);

        pwm.allocate(PwmChannel::Ch0, PwmFrequency::PIC32_39KHZ, 0);
        assert_eq!(bank.borrow().frequency, [Some(39_000); PWM_CHANNELS]);

        pwm.allocate(PwmChannel::Ch3, PwmFrequency::PIC32_78KHZ, 0);
        assert!(PwmChannel::ALL
            .iter()
            .all(|&ch| pwm.frequency(ch) == Some(PwmFrequency::PIC32_78KHZ)));
        assert_eq!(bank.borrow().frequency, [Some(78_000); PWM_CHANNELS]);
    }

    #[test]
    fn test_set_duty_is_per_channel() {
        let bank = RefCell::new(PwmBank::default());
        let mut pwm: PwmAllocator<MockPwm, MockPin> =
            PwmAllocator::new(PwmBank::hardware_slots(&bank), false);

        pwm.set_duty(PwmChannel::Ch0, 10);
        pwm.set_duty(PwmChannel::Ch3, 200);
        pwm.set_duty(PwmChannel::Ch0, 20);

        assert_eq!(bank.borrow().duty, [20, 0, 0, 200]);
        assert_eq!(pwm.duty(PwmChannel::Ch0), 20);
        assert_eq!(pwm.duty(PwmChannel::Ch3), 200);
    }

    #[test]
    fn test_on_off_fallback() {
        let board = RefCell::new(Board::new());
        let bank = RefCell::new(PwmBank::default());
        let [_, ch1, ch2, ch3] = PwmBank::hardware_slots(&bank);
        let slots = [
            PwmSlot::OnOff(MockPin::new(&board, Line::Fallback(0))),
            ch1,
            ch2,
            ch3,
        ];
        let mut pwm = PwmAllocator::new(slots, false);

        assert!(pwm.is_degraded(PwmChannel::Ch0));
        assert!(!pwm.is_degraded(PwmChannel::Ch1));

        pwm.allocate(PwmChannel::Ch0, PwmFrequency::MOTOR12_64KHZ, 0);
        assert!(!board.borrow().level(Line::Fallback(0)));
        // Frequency is recorded even though the pin cannot honour it
        assert_eq!(pwm.frequency(PwmChannel::Ch0), Some(PwmFrequency::MOTOR12_64KHZ));

        pwm.set_duty(PwmChannel::Ch0, 127);
        assert!(!board.borrow().level(Line::Fallback(0)));

        pwm.set_duty(PwmChannel::Ch0, 128);
        assert!(board.borrow().level(Line::Fallback(0)));
        assert_eq!(pwm.duty(PwmChannel::Ch0), 128);

        pwm.set_duty(PwmChannel::Ch0, 0);
        assert!(!board.borrow().level(Line::Fallback(0)));
    }
}
