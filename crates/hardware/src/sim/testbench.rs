//! Testbench: one clock, every model, bounded waits.
//!
//! Each call to [`Testbench::step`] is one rising edge applied to every block
//! in a fixed order: baud generator, UART transmitter, UART receiver, SPI
//! master, SPI slave. Later blocks see the outputs earlier blocks produced on
//! the same edge, which keeps the UART wire and the SPI bus free of an extra
//! cycle of latency.

use tracing::{debug, trace, warn};

use crate::common::constants::{LINE_IDLE, LINE_MARK, LINE_SPACE};
use crate::common::error::SimError;
use crate::config::Config;
use crate::periph::{
    Clocked, SpiMaster, SpiMasterInputs, SpiState, UartRx, UartRxInputs, UartRxState, UartTx,
    UartTxInputs, UartTxState,
};
use crate::sim::baud::{BaudGenerator, BaudInputs};
use crate::sim::spi_slave::{SpiSlave, SpiSlaveInputs};
use crate::stats::SimStats;

/// Outcome of one UART frame at the receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UartFrame {
    /// Frame accepted; the received data bits.
    Data(u8),
    /// Stop bit sampled low.
    FramingError,
}

/// Result of one SPI transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiExchange {
    /// Byte the master shifted out.
    pub sent: u8,
    /// Byte the master shifted in (`data_out`).
    pub received: u8,
    /// Byte the slave recorded, if it saw a full word.
    pub slave_received: Option<u8>,
    /// Cycles from `start` to `ready`.
    pub cycles: u64,
}

/// Stimulus applied for a single clock.
#[derive(Clone, Copy, Debug, Default)]
struct Stimulus {
    uart_start: Option<u8>,
    spi_start: Option<u8>,
    line_override: Option<bool>,
}

/// Builds the line levels of one UART frame, one entry per bit period.
///
/// The sequence is the start bit, `data_bits` data bits LSB first, then
/// `stop_bits` stop bits. Useful for driving hand-made waveforms through
/// [`Testbench::uart_send_raw`].
///
/// # Examples
///
/// ```
/// use logicbench_core::sim::uart_frame_bits;
///
/// let bits = uart_frame_bits(0b1010_0101, 8, 1);
/// assert_eq!(bits.len(), 10);
/// assert!(!bits[0]); // start
/// assert!(bits[1]); // bit 0
/// assert!(bits[9]); // stop
/// ```
pub fn uart_frame_bits(byte: u8, data_bits: u8, stop_bits: u8) -> Vec<bool> {
    let mut bits = Vec::with_capacity(1 + usize::from(data_bits) + usize::from(stop_bits));
    bits.push(LINE_SPACE);
    bits.extend((0..data_bits).map(|i| (byte >> i) & 1 == 1));
    bits.extend(std::iter::repeat_n(LINE_MARK, usize::from(stop_bits)));
    bits
}

/// Cycle-stepped testbench owning every model.
#[derive(Debug)]
pub struct Testbench {
    config: Config,
    cycle: u64,
    rst_n: bool,
    baud: BaudGenerator,
    uart_tx: UartTx,
    uart_rx: UartRx,
    spi: SpiMaster,
    slave: SpiSlave,
    stats: SimStats,
}

impl Testbench {
    /// Builds a testbench from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `config` fails validation.
    pub fn new(config: Config) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            baud: BaudGenerator::new(&config.uart),
            uart_tx: UartTx::new("uart_tx0", &config.uart),
            uart_rx: UartRx::new("uart_rx0", &config.uart),
            spi: SpiMaster::new("spi0", &config.spi),
            slave: SpiSlave::new(&config.spi),
            stats: SimStats::default(),
            cycle: 0,
            rst_n: true,
            config,
        })
    }

    /// Configuration in effect.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Statistics collected so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// UART transmitter model.
    pub const fn uart_tx(&self) -> &UartTx {
        &self.uart_tx
    }

    /// UART receiver model.
    pub const fn uart_rx(&self) -> &UartRx {
        &self.uart_rx
    }

    /// SPI master model.
    pub const fn spi_master(&self) -> &SpiMaster {
        &self.spi
    }

    /// SPI slave model.
    pub const fn spi_slave(&self) -> &SpiSlave {
        &self.slave
    }

    /// System clocks in one UART bit period.
    pub const fn clocks_per_bit(&self) -> u64 {
        self.baud.clocks_per_bit()
    }

    /// Holds `rst_n` low for `sim.reset_cycles` clocks, then releases it.
    ///
    /// The SPI slave has no reset pin; it is cleared alongside.
    pub fn reset(&mut self) {
        self.rst_n = false;
        for _ in 0..self.config.sim.reset_cycles {
            self.step_with(Stimulus::default());
            self.stats.reset_cycles += 1;
        }
        self.rst_n = true;
        self.slave.reset();
        debug!(cycle = self.cycle, "reset released");
    }

    /// Advances every model by one clock with no new requests.
    pub fn step(&mut self) {
        self.step_with(Stimulus::default());
    }

    /// Advances `n` clocks.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    fn step_with(&mut self, stim: Stimulus) {
        let rst_n = self.rst_n;

        self.baud.clock(&BaudInputs { rst_n });
        let ticks = self.baud.outputs();

        self.uart_tx.clock(&UartTxInputs {
            rst_n,
            start: stim.uart_start.is_some(),
            data: stim.uart_start.unwrap_or(0),
            baud_tick: ticks.baud,
        });
        let line = stim.line_override.unwrap_or(self.uart_tx.outputs().tx);

        self.uart_rx.clock(&UartRxInputs {
            rst_n,
            rx: line,
            sample_tick: ticks.sample,
        });

        self.spi.clock(&SpiMasterInputs {
            rst_n,
            start: stim.spi_start.is_some(),
            data_in: stim.spi_start.unwrap_or(0),
            miso: self.slave.outputs().miso,
        });
        let spi = self.spi.outputs();
        self.slave.clock(&SpiSlaveInputs::from(spi));

        if self.config.sim.trace {
            trace!(
                cycle = self.cycle,
                rst_n,
                uart_line = line,
                sclk = spi.sclk,
                cs_n = spi.cs_n,
                mosi = spi.mosi,
                miso = self.slave.outputs().miso,
                "wires"
            );
        }

        self.cycle += 1;
        self.stats.cycles += 1;
    }

    /// Steps until `poll` yields a value, giving up after `sim.max_cycles`.
    ///
    /// `poll` is checked before the first step, so a condition that already
    /// holds costs no cycles. Returns the value and the cycles spent.
    fn wait_until<T>(
        &mut self,
        waiting_for: &'static str,
        mut poll: impl FnMut(&Self) -> Option<T>,
    ) -> Result<(T, u64), SimError> {
        let start = self.cycle;
        loop {
            let elapsed = self.cycle - start;
            if let Some(value) = poll(self) {
                return Ok((value, elapsed));
            }
            if elapsed >= self.config.sim.max_cycles {
                warn!(waiting_for, cycles = elapsed, "testbench wait timed out");
                return Err(SimError::Timeout {
                    waiting_for,
                    cycles: elapsed,
                });
            }
            self.step();
        }
    }

    /// Reads the receiver's one-clock status pulses.
    fn rx_outcome(&self) -> Option<UartFrame> {
        let out = self.uart_rx.outputs();
        if out.ready {
            Some(UartFrame::Data(out.data))
        } else if out.error {
            Some(UartFrame::FramingError)
        } else {
            None
        }
    }

    fn record_frame(&mut self, frame: UartFrame) {
        match frame {
            UartFrame::Data(_) => self.stats.uart_bytes_received += 1,
            UartFrame::FramingError => {
                self.stats.uart_framing_errors += 1;
                warn!(cycle = self.cycle, "uart framing error");
            }
        }
    }

    fn sync_rx_stats(&mut self) {
        self.stats.uart_glitches_rejected = self.uart_rx.glitches_rejected();
    }

    /// Requests a transmission without waiting for it to finish.
    ///
    /// The request is applied on the next clock, which this call performs.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] if the transmitter is mid-frame.
    pub fn uart_begin(&mut self, byte: u8) -> Result<(), SimError> {
        if self.uart_tx.state() != UartTxState::Idle {
            return Err(SimError::Busy {
                device: self.uart_tx.name().to_string(),
            });
        }

        self.step_with(Stimulus {
            uart_start: Some(byte),
            ..Stimulus::default()
        });
        self.stats.uart_bytes_sent += 1;
        Ok(())
    }

    /// Sends one byte from the transmitter to the receiver.
    ///
    /// Returns once the receiver has reported the frame and the transmitter
    /// is idle again, so calls can be chained back to back. Bits above
    /// `uart.data_bits` are not transmitted.
    ///
    /// # Errors
    ///
    /// - [`SimError::Busy`] if the transmitter is mid-frame.
    /// - [`SimError::Timeout`] if either wait exceeds `sim.max_cycles`.
    pub fn uart_send(&mut self, byte: u8) -> Result<UartFrame, SimError> {
        self.uart_begin(byte)?;

        let (frame, _) = self.wait_until("uart_rx frame", Self::rx_outcome)?;
        let _ = self.wait_until("uart_tx idle", |tb| {
            (tb.uart_tx.state() == UartTxState::Idle).then_some(())
        })?;

        self.record_frame(frame);
        self.sync_rx_stats();
        debug!(byte, ?frame, cycle = self.cycle, "uart frame");
        Ok(frame)
    }

    /// Sends a sequence of bytes and collects every frame outcome.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first [`SimError`].
    pub fn uart_send_all(&mut self, bytes: &[u8]) -> Result<Vec<UartFrame>, SimError> {
        bytes.iter().map(|&b| self.uart_send(b)).collect()
    }

    /// Drives an arbitrary waveform into the receiver, bypassing the transmitter.
    ///
    /// Each entry of `bits` is held for one bit period. The line then returns
    /// to idle for two more bit periods and stays idle until the receiver is
    /// back in `Idle`, so a truncated frame is finished off with mark bits
    /// rather than left for the next transaction. Returns the first frame the
    /// receiver reported, or `None` if it reported nothing (for example after
    /// a rejected glitch).
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Timeout`] if the receiver does not return to idle
    /// within `sim.max_cycles`.
    pub fn uart_send_raw(&mut self, bits: &[bool]) -> Result<Option<UartFrame>, SimError> {
        let period = self.clocks_per_bit();
        let mut frame = None;

        let idle_tail = [LINE_IDLE, LINE_IDLE];
        for &level in bits.iter().chain(idle_tail.iter()) {
            for _ in 0..period {
                self.step_with(Stimulus {
                    line_override: Some(level),
                    ..Stimulus::default()
                });
                if frame.is_none() {
                    frame = self.rx_outcome();
                }
            }
        }

        let _ = self.wait_until("uart_rx idle", |tb| {
            if frame.is_none() {
                frame = tb.rx_outcome();
            }
            (tb.uart_rx.state() == UartRxState::Idle).then_some(())
        })?;

        if let Some(frame) = frame {
            self.record_frame(frame);
        }
        self.sync_rx_stats();
        Ok(frame)
    }

    /// Requests an SPI transaction without waiting for it to finish.
    ///
    /// The slave will answer with `response`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Busy`] if the master is mid-transaction.
    pub fn spi_begin(&mut self, byte: u8, response: u8) -> Result<(), SimError> {
        if self.spi.state() != SpiState::Idle {
            return Err(SimError::Busy {
                device: self.spi.name().to_string(),
            });
        }

        self.slave.load_response(response);
        self.step_with(Stimulus {
            spi_start: Some(byte),
            ..Stimulus::default()
        });
        Ok(())
    }

    /// Runs one SPI transaction.
    ///
    /// The slave answers with `response`. Returns after the master has raised
    /// chip select and returned to idle.
    ///
    /// # Errors
    ///
    /// - [`SimError::Busy`] if the master is mid-transaction.
    /// - [`SimError::Timeout`] if the transaction exceeds `sim.max_cycles`.
    pub fn spi_transfer(&mut self, byte: u8, response: u8) -> Result<SpiExchange, SimError> {
        let seen_before = self.slave.received().len();
        self.spi_begin(byte, response)?;
        let (received, waited) = self.wait_until("spi ready", |tb| {
            let out = tb.spi.outputs();
            out.ready.then_some(out.data_out)
        })?;
        self.step();

        let slave_received = if self.slave.received().len() > seen_before {
            self.stats.spi_slave_bytes += 1;
            self.slave.last_received()
        } else {
            None
        };
        self.stats.spi_transfers += 1;

        let exchange = SpiExchange {
            sent: byte,
            received,
            slave_received,
            cycles: waited + 1,
        };
        debug!(?exchange, mode = self.config.spi.mode(), "spi transfer");
        Ok(exchange)
    }
}
