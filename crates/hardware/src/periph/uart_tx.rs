//! UART transmitter.
//!
//! Serializes one byte per request into an 8N1-style frame (data width and
//! stop-bit count are configurable). Bit boundaries follow `baud_tick`, a
//! one-clock pulse per bit period, so every bit including the start bit lasts
//! exactly one period:
//!
//! ```text
//!  tx  ‾‾‾‾‾‾|_____|  d0 |  d1 | ... | d7  |‾‾‾‾‾‾‾‾‾‾‾‾|
//!      Idle   Start  Data ...             Stop    Cleanup
//! ```

use tracing::trace;

use crate::common::constants::{
    LINE_IDLE, LINE_SPACE, UART_MAX_DATA_BITS, UART_MAX_STOP_BITS, UART_MIN_DATA_BITS,
    UART_MIN_STOP_BITS,
};
use crate::config::UartConfig;
use crate::periph::Clocked;

/// Transmitter state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UartTxState {
    /// Line idle high, waiting for `start`.
    Idle,
    /// Frame latched; start bit pending or being driven.
    Start,
    /// Shifting data bits out, LSB first.
    Data,
    /// Driving the stop bit(s).
    Stop,
    /// One-clock `done` pulse before returning to `Idle`.
    Cleanup,
}

/// Transmitter inputs, sampled at the rising edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartTxInputs {
    /// Synchronous active-low reset.
    pub rst_n: bool,
    /// Request to send `data`; honoured only in `Idle`.
    pub start: bool,
    /// Byte to send.
    pub data: u8,
    /// One-clock pulse marking a bit-period boundary.
    pub baud_tick: bool,
}

impl Default for UartTxInputs {
    fn default() -> Self {
        Self {
            rst_n: true,
            start: false,
            data: 0,
            baud_tick: false,
        }
    }
}

/// Transmitter outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UartTxOutputs {
    /// Serial line.
    pub tx: bool,
    /// High from the accepted `start` until the frame's stop bits are done.
    pub busy: bool,
    /// One-clock pulse after the last stop bit.
    pub done: bool,
}

/// UART transmitter model.
#[derive(Clone, Debug)]
pub struct UartTx {
    name: String,
    data_bits: u8,
    stop_bits: u8,
    state: UartTxState,
    shift: u8,
    bit_index: u8,
    stop_count: u8,
    tx: bool,
    busy: bool,
    done: bool,
}

impl UartTx {
    /// Creates a transmitter in its reset state.
    ///
    /// `data_bits` and `stop_bits` are clamped to the widths the frame format
    /// supports.
    pub fn new(name: impl Into<String>, config: &UartConfig) -> Self {
        Self {
            name: name.into(),
            data_bits: config.data_bits.clamp(UART_MIN_DATA_BITS, UART_MAX_DATA_BITS),
            stop_bits: config.stop_bits.clamp(UART_MIN_STOP_BITS, UART_MAX_STOP_BITS),
            state: UartTxState::Idle,
            shift: 0,
            bit_index: 0,
            stop_count: 0,
            tx: LINE_IDLE,
            busy: false,
            done: false,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> UartTxState {
        self.state
    }

    fn reset(&mut self) {
        self.state = UartTxState::Idle;
        self.shift = 0;
        self.bit_index = 0;
        self.stop_count = 0;
        self.tx = LINE_IDLE;
        self.busy = false;
        self.done = false;
    }

    fn transition(&mut self, next: UartTxState) {
        trace!(device = %self.name, from = ?self.state, to = ?next, "uart tx state");
        self.state = next;
    }

    const fn data_bit(&self, index: u8) -> bool {
        (self.shift >> index) & 1 == 1
    }
}

impl Clocked for UartTx {
    type Inputs = UartTxInputs;
    type Outputs = UartTxOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&mut self, inputs: &UartTxInputs) {
        if !inputs.rst_n {
            self.reset();
            return;
        }

        self.done = false;

        match self.state {
            UartTxState::Idle => {
                self.tx = LINE_IDLE;
                if inputs.start {
                    self.shift = inputs.data;
                    self.bit_index = 0;
                    self.stop_count = 0;
                    self.busy = true;
                    self.transition(UartTxState::Start);
                }
            }
            UartTxState::Start => {
                if inputs.baud_tick {
                    if self.tx == LINE_IDLE {
                        // First boundary after the request opens the start bit.
                        self.tx = LINE_SPACE;
                    } else {
                        self.tx = self.data_bit(0);
                        self.transition(UartTxState::Data);
                    }
                }
            }
            UartTxState::Data => {
                if inputs.baud_tick {
                    self.bit_index += 1;
                    if self.bit_index == self.data_bits {
                        self.tx = LINE_IDLE;
                        self.transition(UartTxState::Stop);
                    } else {
                        self.tx = self.data_bit(self.bit_index);
                    }
                }
            }
            UartTxState::Stop => {
                if inputs.baud_tick {
                    self.stop_count += 1;
                    if self.stop_count == self.stop_bits {
                        self.busy = false;
                        self.done = true;
                        self.transition(UartTxState::Cleanup);
                    }
                }
            }
            UartTxState::Cleanup => self.transition(UartTxState::Idle),
        }
    }

    fn outputs(&self) -> UartTxOutputs {
        UartTxOutputs {
            tx: self.tx,
            busy: self.busy,
            done: self.done,
        }
    }
}
