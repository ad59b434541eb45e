//! SPI master.
//!
//! Full-duplex, one byte per transaction, with configurable clock polarity
//! (CPOL), clock phase (CPHA) and bit order. SCLK is derived from the system
//! clock by toggling every `clock_div` cycles.
//!
//! Edge roles per phase:
//!
//! | CPHA | MOSI first driven   | MISO sampled   | MOSI shifted   |
//! |------|---------------------|----------------|----------------|
//! | 0    | when CS is asserted | leading edges  | trailing edges |
//! | 1    | first leading edge  | trailing edges | leading edges  |

use tracing::trace;

use crate::common::constants::{CS_INACTIVE, SPI_EDGES_PER_WORD};
use crate::config::SpiConfig;
use crate::periph::Clocked;

/// Master state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpiState {
    /// Chip select released, SCLK at its idle level.
    Idle,
    /// Chip select asserted; half a period before the first edge.
    Setup,
    /// Generating the 16 SCLK edges of one byte.
    Transfer,
    /// Half a period after the last edge with chip select still asserted.
    Hold,
    /// Chip select released and `ready` pulsed.
    Done,
}

/// Master inputs, sampled at the rising edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiMasterInputs {
    /// Synchronous active-low reset.
    pub rst_n: bool,
    /// Request a transfer of `data_in`; honoured only in `Idle`.
    pub start: bool,
    /// Byte to shift out.
    pub data_in: u8,
    /// Serial data from the slave.
    pub miso: bool,
}

impl Default for SpiMasterInputs {
    fn default() -> Self {
        Self {
            rst_n: true,
            start: false,
            data_in: 0,
            miso: false,
        }
    }
}

/// Master outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiMasterOutputs {
    /// Serial data to the slave.
    pub mosi: bool,
    /// Serial clock.
    pub sclk: bool,
    /// Active-low chip select.
    pub cs_n: bool,
    /// Byte received in the last completed transfer.
    pub data_out: u8,
    /// High from the accepted `start` until `ready`.
    pub busy: bool,
    /// One-clock pulse when `data_out` is updated.
    pub ready: bool,
}

/// SPI master model.
#[derive(Clone, Debug)]
pub struct SpiMaster {
    name: String,
    clock_div: u32,
    cpol: bool,
    cpha: bool,
    msb_first: bool,
    state: SpiState,
    div_count: u32,
    edge_count: u8,
    tx_shift: u8,
    rx_shift: u8,
    mosi: bool,
    sclk: bool,
    cs_n: bool,
    data_out: u8,
    busy: bool,
    ready: bool,
}

impl SpiMaster {
    /// Creates a master in its reset state.
    pub fn new(name: impl Into<String>, config: &SpiConfig) -> Self {
        Self {
            name: name.into(),
            clock_div: config.clock_div.max(1),
            cpol: config.cpol,
            cpha: config.cpha,
            msb_first: config.msb_first,
            state: SpiState::Idle,
            div_count: 0,
            edge_count: 0,
            tx_shift: 0,
            rx_shift: 0,
            mosi: false,
            sclk: config.cpol,
            cs_n: CS_INACTIVE,
            data_out: 0,
            busy: false,
            ready: false,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> SpiState {
        self.state
    }

    fn reset(&mut self) {
        self.state = SpiState::Idle;
        self.div_count = 0;
        self.edge_count = 0;
        self.tx_shift = 0;
        self.rx_shift = 0;
        self.mosi = false;
        self.sclk = self.cpol;
        self.cs_n = CS_INACTIVE;
        self.data_out = 0;
        self.busy = false;
        self.ready = false;
    }

    fn transition(&mut self, next: SpiState) {
        trace!(device = %self.name, from = ?self.state, to = ?next, "spi state");
        self.state = next;
    }

    /// Counts one system clock; returns `true` at the end of a half period.
    const fn half_period_elapsed(&mut self) -> bool {
        self.div_count += 1;
        if self.div_count == self.clock_div {
            self.div_count = 0;
            true
        } else {
            false
        }
    }

    /// Drives the next outgoing bit onto MOSI and advances the shift register.
    const fn shift_out(&mut self) {
        if self.msb_first {
            self.mosi = self.tx_shift & 0x80 != 0;
            self.tx_shift <<= 1;
        } else {
            self.mosi = self.tx_shift & 0x01 != 0;
            self.tx_shift >>= 1;
        }
    }

    /// Captures one incoming bit.
    const fn shift_in(&mut self, bit: bool) {
        if self.msb_first {
            self.rx_shift = (self.rx_shift << 1) | bit as u8;
        } else {
            self.rx_shift = (self.rx_shift >> 1) | ((bit as u8) << 7);
        }
    }

    fn clock_edge(&mut self, miso: bool) {
        self.sclk = !self.sclk;
        self.edge_count += 1;

        let leading = self.edge_count % 2 == 1;
        let sample = leading != self.cpha;

        if sample {
            self.shift_in(miso);
        } else if self.cpha || self.edge_count < SPI_EDGES_PER_WORD {
            // CPHA=0 has no bit left to drive after the final trailing edge.
            self.shift_out();
        }

        if self.edge_count == SPI_EDGES_PER_WORD {
            self.transition(SpiState::Hold);
        }
    }
}

impl Clocked for SpiMaster {
    type Inputs = SpiMasterInputs;
    type Outputs = SpiMasterOutputs;

    fn name(&self) -> &str {
        &self.name
    }

    fn clock(&mut self, inputs: &SpiMasterInputs) {
        if !inputs.rst_n {
            self.reset();
            return;
        }

        self.ready = false;

        match self.state {
            SpiState::Idle => {
                self.sclk = self.cpol;
                self.cs_n = CS_INACTIVE;
                if inputs.start {
                    self.tx_shift = inputs.data_in;
                    self.rx_shift = 0;
                    self.div_count = 0;
                    self.edge_count = 0;
                    self.busy = true;
                    self.cs_n = !CS_INACTIVE;
                    if !self.cpha {
                        self.shift_out();
                    }
                    self.transition(SpiState::Setup);
                }
            }
            SpiState::Setup => {
                if self.half_period_elapsed() {
                    self.transition(SpiState::Transfer);
                }
            }
            SpiState::Transfer => {
                if self.half_period_elapsed() {
                    self.clock_edge(inputs.miso);
                }
            }
            SpiState::Hold => {
                if self.half_period_elapsed() {
                    self.cs_n = CS_INACTIVE;
                    self.data_out = self.rx_shift;
                    self.busy = false;
                    self.ready = true;
                    self.transition(SpiState::Done);
                }
            }
            SpiState::Done => self.transition(SpiState::Idle),
        }
    }

    fn outputs(&self) -> SpiMasterOutputs {
        SpiMasterOutputs {
            mosi: self.mosi,
            sclk: self.sclk,
            cs_n: self.cs_n,
            data_out: self.data_out,
            busy: self.busy,
            ready: self.ready,
        }
    }
}
