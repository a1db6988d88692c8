//! IR carrier on a general-purpose timer channel
//!
//! The timer is set up once by embassy's `SimplePwm` (clock, pins, PWM
//! mode, outputs enabled). Afterwards only the auto-reload and compare
//! registers are touched: the reload sets the carrier period, a compare of
//! half the period gates it on and zero gates it off.

use embassy_stm32::pac::timer::TimGp16;
use gatelink_hal::CarrierOutput;

/// One channel of a 16-bit timer used as an IR emitter
///
/// Channels of the same timer share its period.
pub struct TimerCarrier {
    timer: TimGp16,
    /// Zero-based compare channel
    channel: usize,
    ticks_per_us: u32,
}

impl TimerCarrier {
    /// `timer_clock_hz` is the timer's input clock
    ///
    /// The timer must run undivided, which is how `SimplePwm` leaves it at
    /// carrier frequencies.
    pub fn new(timer: TimGp16, channel: usize, timer_clock_hz: u32) -> Self {
        Self {
            timer,
            channel,
            ticks_per_us: timer_clock_hz / 1_000_000,
        }
    }
}

impl CarrierOutput for TimerCarrier {
    fn set_period_us(&mut self, period_us: u32) {
        let ticks = period_us
            .saturating_mul(self.ticks_per_us)
            .clamp(2, u16::MAX as u32 + 1);
        self.timer.arr().write(|w| w.set_arr((ticks - 1) as u16));
    }

    fn carrier_on(&mut self) {
        let reload = self.timer.arr().read().arr() as u32;
        let half = ((reload + 1) / 2) as u16;
        self.timer.ccr(self.channel).write(|w| w.set_ccr(half));
    }

    fn carrier_off(&mut self) {
        self.timer.ccr(self.channel).write(|w| w.set_ccr(0));
    }
}
