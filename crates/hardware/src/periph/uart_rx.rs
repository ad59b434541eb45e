//! UART receiver.
//!
//! Oversampling deserializer. The `rx` pin passes through a two-flop
//! synchronizer, a falling edge opens a frame, and every bit is sampled once
//! at its midpoint counted in `sample_tick` pulses:
//!
//! - the start bit is re-checked at `oversample / 2` ticks; a high level there
//!   is treated as a glitch and the frame is dropped;
//! - each data bit is sampled `oversample` ticks after the previous sample;
//! - the stop bit must be high, otherwise `error` pulses instead of `ready`.

use tracing::{debug, trace};

use crate::common::constants::{
    LINE_IDLE, LINE_SPACE, UART_MAX_DATA_BITS, UART_MIN_DATA_BITS, UART_MIN_OVERSAMPLE,
};
use crate::common::signal::{EdgeDetector, Synchronizer};
use crate::config::UartConfig;
use crate::periph::Clocked;

/// Receiver state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UartRxState {
    /// Waiting for a falling edge on the synchronized line.
    Idle,
    /// Counting to the middle of the start bit.
    Start,
    /// Sampling data bits, LSB first.
    Data,
    /// Sampling the stop bit.
    Stop,
    /// One clock holding the `ready`/`error` pulse.
    Cleanup,
}

/// Receiver inputs, sampled at the rising edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartRxInputs {
    /// Synchronous active-low reset.
    pub rst_n: bool,
    /// Asynchronous serial line.
    pub rx: bool,
    /// Oversample tick, `oversample` pulses per bit period.
    pub sample_tick: bool,
}

impl Default for UartRxInputs {
    fn default() -> Self {
        Self {
            rst_n: true,
            rx: LINE_IDLE,
            sample_tick: false,
        }
    }
}

/// Receiver outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartRxOutputs {
    /// Last byte received with a valid stop bit.
    pub data: u8,
    /// One-clock pulse when `data` is updated.
    pub ready: bool,
    /// One-clock pulse on a framing error (stop bit sampled low).
    pub error: bool,
}

/// UART receiver model.
#[derive(Clone, Debug)]
pub struct UartRx {
    name: String,
    oversample: u32,
    data_bits: u8,
    state: UartRxState,
    sync: Synchronizer,
    edge: EdgeDetector,
    tick_count: u32,
    bit_index: u8,
    shift: u8,
    data: u8,
    ready: bool,
    error: bool,
    glitches: u64,
}

impl UartRx {
    /// Creates a receiver in its reset state.
    ///
    /// `oversample` is raised to at least two and `data_bits` is clamped to
    /// the supported frame widths.
    pub fn new(name: impl Into<String>, config: &UartConfig) -> Self {
        Self {
            name: name.into(),
            oversample: config.oversample.max(UART_MIN_OVERSAMPLE),
            data_bits: config.data_bits.clamp(UART_MIN_DATA_BITS, UART_MAX_DATA_BITS),
            state: UartRxState::Idle,
            sync: Synchronizer::new(LINE_IDLE),
            edge: EdgeDetector::new(LINE_IDLE),
            tick_count: 0,
            bit_index: 0,
            shift: 0,
            data: 0,
            ready: false,
            error: false,
            glitches: 0,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> UartRxState {
        self.state
    }

    /// Number of start bits rejected as glitches since construction.
    ///
    /// This is an instrumentation counter, not a hardware register; reset
    /// does not clear it.
    pub const fn glitches_rejected(&self) -> u64 {
        self.glitches
    }

    fn reset(&mut self) {
        self.state = UartRxState::Idle;
        self.sync.reset(LINE_IDLE);
        self.edge.reset(LINE_IDLE);
        self.tick_count = 0;
        self.bit_index = 0;
        self.shift = 0;
        self.data = 0;
        self.ready = false;
        self.error = false;
    }

    fn transition(&mut self, next: UartRxState) {
        trace!(device = %self.name, from = ?self.state, to = ?next, "uart rx state");
        self.state = next;
    }

    /// Advances the tick counter; returns `true` when it reaches `target`.
    const fn count_to(&mut self, target: u32) -> bool {
        self.tick_count += 1;
        if self.tick_count == target {
            self.tick_count = 0;
            true
        } else {
            false
        }
    }
}

impl Clocked for UartRx {
    type Inputs = UartRxInputs;
    type Outputs = UartRxOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&mut self, inputs: &UartRxInputs) {
        if !inputs.rst_n {
            self.reset();
            return;
        }

        let line = self.sync.clock(inputs.rx);
        let fell = self.edge.falling(line);
        self.ready = false;
        self.error = false;

        match self.state {
            UartRxState::Idle => {
                if fell {
                    self.tick_count = 0;
                    self.transition(UartRxState::Start);
                }
            }
            UartRxState::Start => {
                if inputs.sample_tick && self.count_to(self.oversample / 2) {
                    if line == LINE_SPACE {
                        self.bit_index = 0;
                        self.shift = 0;
                        self.transition(UartRxState::Data);
                    } else {
                        self.glitches += 1;
                        debug!(device = %self.name, "start bit glitch rejected");
                        self.transition(UartRxState::Idle);
                    }
                }
            }
            UartRxState::Data => {
                if inputs.sample_tick && self.count_to(self.oversample) {
                    self.shift |= u8::from(line) << self.bit_index;
                    self.bit_index += 1;
                    if self.bit_index == self.data_bits {
                        self.transition(UartRxState::Stop);
                    }
                }
            }
            UartRxState::Stop => {
                if inputs.sample_tick && self.count_to(self.oversample) {
                    if line == LINE_IDLE {
                        self.data = self.shift;
                        self.ready = true;
                    } else {
                        self.error = true;
                        debug!(device = %self.name, shift = self.shift, "framing error");
                    }
                    self.transition(UartRxState::Cleanup);
                }
            }
            UartRxState::Cleanup => self.transition(UartRxState::Idle),
        }
    }

    fn outputs(&self) -> UartRxOutputs {
        UartRxOutputs {
            data: self.data,
            ready: self.ready,
            error: self.error,
        }
    }
}
