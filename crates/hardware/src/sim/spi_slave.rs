//! Behavioural SPI slave used as the far end of the master in the testbench.
//!
//! The slave reacts to the master's registered outputs in the same cycle:
//! it watches for chip-select and SCLK transitions, answers with a preloaded
//! byte and records every complete byte it receives.

use crate::common::constants::{CS_INACTIVE, SPI_WORD_BITS};
use crate::common::signal::EdgeDetector;
use crate::config::SpiConfig;
use crate::periph::{Clocked, SpiMasterOutputs};

/// Slave inputs: the bus lines driven by the master.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiSlaveInputs {
    /// Serial clock.
    pub sclk: bool,
    /// Serial data from the master.
    pub mosi: bool,
    /// Active-low chip select.
    pub cs_n: bool,
}

impl From<SpiMasterOutputs> for SpiSlaveInputs {
    fn from(bus: SpiMasterOutputs) -> Self {
        Self {
            sclk: bus.sclk,
            mosi: bus.mosi,
            cs_n: bus.cs_n,
        }
    }
}

/// Slave outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiSlaveOutputs {
    /// Serial data to the master.
    pub miso: bool,
}

/// Shift-register SPI slave.
#[derive(Clone, Debug)]
pub struct SpiSlave {
    cpol: bool,
    cpha: bool,
    msb_first: bool,
    response: u8,
    tx_shift: u8,
    rx_shift: u8,
    bits_received: u8,
    miso: bool,
    cs: EdgeDetector,
    prev_sclk: bool,
    received: Vec<u8>,
}

impl SpiSlave {
    /// Creates a deselected slave speaking the same mode as `config`.
    pub const fn new(config: &SpiConfig) -> Self {
        Self {
            cpol: config.cpol,
            cpha: config.cpha,
            msb_first: config.msb_first,
            response: 0,
            tx_shift: 0,
            rx_shift: 0,
            bits_received: 0,
            miso: false,
            cs: EdgeDetector::new(CS_INACTIVE),
            prev_sclk: config.cpol,
            received: Vec::new(),
        }
    }

    /// Sets the byte returned on MISO during the next transaction.
    pub const fn load_response(&mut self, byte: u8) {
        self.response = byte;
    }

    /// Every complete byte received so far, oldest first.
    pub fn received(&self) -> &[u8] {
        &self.received
    }

    /// The most recent complete byte, if any.
    pub fn last_received(&self) -> Option<u8> {
        self.received.last().copied()
    }

    /// Returns the slave to its deselected state and forgets history.
    pub fn reset(&mut self) {
        self.tx_shift = 0;
        self.rx_shift = 0;
        self.bits_received = 0;
        self.miso = false;
        self.cs.reset(CS_INACTIVE);
        self.prev_sclk = self.cpol;
        self.received.clear();
    }

    const fn shift_out(&mut self) {
        if self.msb_first {
            self.miso = self.tx_shift & 0x80 != 0;
            self.tx_shift <<= 1;
        } else {
            self.miso = self.tx_shift & 0x01 != 0;
            self.tx_shift >>= 1;
        }
    }

    const fn shift_in(&mut self, bit: bool) {
        if self.msb_first {
            self.rx_shift = (self.rx_shift << 1) | bit as u8;
        } else {
            self.rx_shift = (self.rx_shift >> 1) | ((bit as u8) << 7);
        }
        self.bits_received = self.bits_received.saturating_add(1);
    }
}

impl Clocked for SpiSlave {
    type Inputs = SpiSlaveInputs;
    type Outputs = SpiSlaveOutputs;

    fn name(&self) -> &str {
        "spi_slave"
    }

    fn clock(&mut self, inputs: &SpiSlaveInputs) {
        let selected = inputs.cs_n != CS_INACTIVE;

        if self.cs.falling(inputs.cs_n) {
            self.tx_shift = self.response;
            self.rx_shift = 0;
            self.bits_received = 0;
            self.prev_sclk = inputs.sclk;
            if !self.cpha {
                self.shift_out();
            }
            return;
        }

        if !selected {
            if self.bits_received >= SPI_WORD_BITS {
                self.received.push(self.rx_shift);
            }
            self.bits_received = 0;
            self.prev_sclk = inputs.sclk;
            return;
        }

        if inputs.sclk != self.prev_sclk {
            let leading = inputs.sclk != self.cpol;
            if leading != self.cpha {
                self.shift_in(inputs.mosi);
            } else {
                self.shift_out();
            }
        }
        self.prev_sclk = inputs.sclk;
    }

    fn outputs(&self) -> SpiSlaveOutputs {
        SpiSlaveOutputs { miso: self.miso }
    }
}
