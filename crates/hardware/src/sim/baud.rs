//! Baud-rate generator.
//!
//! A free-running divider that emits the receiver's oversample tick every
//! `divisor` clocks and the transmitter's bit tick on every `oversample`-th
//! sample tick. Both ticks are one-clock pulses. Both share one counter, so a
//! bit tick always coincides with a sample tick.

use crate::common::constants::UART_MIN_OVERSAMPLE;
use crate::config::UartConfig;
use crate::periph::Clocked;

/// Generator inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaudInputs {
    /// Synchronous active-low reset.
    pub rst_n: bool,
}

/// Generator outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaudTicks {
    /// Oversample tick for the receiver.
    pub sample: bool,
    /// Bit-period tick for the transmitter.
    pub baud: bool,
}

/// Clock divider producing [`BaudTicks`].
#[derive(Clone, Debug)]
pub struct BaudGenerator {
    divisor: u64,
    oversample: u32,
    div_count: u64,
    sample_count: u32,
    ticks: BaudTicks,
}

impl BaudGenerator {
    /// Creates a generator for the given UART timing.
    ///
    /// The divisor is `round(clock_hz / (baud_rate * oversample))`, clamped to
    /// at least one. The oversampling ratio is raised to the receiver's
    /// minimum so both ends agree on the bit period.
    pub fn new(config: &UartConfig) -> Self {
        Self {
            divisor: config.sample_divisor(),
            oversample: config.oversample.max(UART_MIN_OVERSAMPLE),
            div_count: 0,
            sample_count: 0,
            ticks: BaudTicks::default(),
        }
    }

    /// System clocks between two sample ticks.
    pub const fn divisor(&self) -> u64 {
        self.divisor
    }

    /// System clocks in one bit period.
    pub const fn clocks_per_bit(&self) -> u64 {
        self.divisor.saturating_mul(self.oversample as u64)
    }
}

impl Clocked for BaudGenerator {
    type Inputs = BaudInputs;
    type Outputs = BaudTicks;

    fn name(&self) -> &str {
        "baud_gen"
    }

    fn clock(&mut self, inputs: &BaudInputs) {
        self.ticks = BaudTicks::default();
        if !inputs.rst_n {
            self.div_count = 0;
            self.sample_count = 0;
            return;
        }

        self.div_count += 1;
        if self.div_count == self.divisor {
            self.div_count = 0;
            self.ticks.sample = true;
            self.sample_count += 1;
            if self.sample_count == self.oversample {
                self.sample_count = 0;
                self.ticks.baud = true;
            }
        }
    }

    fn outputs(&self) -> BaudTicks {
        self.ticks
    }
}
