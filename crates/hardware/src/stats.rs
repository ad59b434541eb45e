//! Testbench statistics collection and reporting.
//!
//! This module tracks what a testbench run did. It provides:
//! 1. **Cycles:** Total simulated clocks and host wall time.
//! 2. **UART:** Bytes sent and received, framing errors and rejected start-bit glitches.
//! 3. **SPI:** Completed transfers and bytes seen by the slave.

use std::time::Instant;

/// Counters accumulated by a [`Testbench`](crate::sim::Testbench).
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulated clock cycles.
    pub cycles: u64,
    /// Cycles spent with reset asserted.
    pub reset_cycles: u64,

    /// Bytes handed to the UART transmitter.
    pub uart_bytes_sent: u64,
    /// Bytes delivered by the receiver with a valid stop bit.
    pub uart_bytes_received: u64,
    /// Frames whose stop bit was sampled low.
    pub uart_framing_errors: u64,
    /// Start bits the receiver rejected as glitches.
    pub uart_glitches_rejected: u64,

    /// SPI transactions completed by the master.
    pub spi_transfers: u64,
    /// Bytes the slave recorded across all transactions.
    pub spi_slave_bytes: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            reset_cycles: 0,
            uart_bytes_sent: 0,
            uart_bytes_received: 0,
            uart_framing_errors: 0,
            uart_glitches_rejected: 0,
            spi_transfers: 0,
            spi_slave_bytes: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "uart", "spi"];

impl SimStats {
    /// Fraction of sent UART bytes that arrived intact, in `[0, 1]`.
    ///
    /// Returns `1.0` when nothing has been sent.
    pub fn uart_delivery_ratio(&self) -> f64 {
        if self.uart_bytes_sent == 0 {
            return 1.0;
        }
        self.uart_bytes_received as f64 / self.uart_bytes_sent as f64
    }

    /// Prints only the requested sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();

        if want("summary") {
            let khz = if seconds > 0.0 {
                (self.cycles as f64 / seconds) / 1000.0
            } else {
                0.0
            };
            println!("\n==========================================================");
            println!("LOGICBENCH SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_reset_cycles         {}", self.reset_cycles);
            println!("sim_freq                 {khz:.2} kHz");
            println!("----------------------------------------------------------");
        }

        if want("uart") {
            println!("UART");
            println!("  bytes_sent             {}", self.uart_bytes_sent);
            println!("  bytes_received         {}", self.uart_bytes_received);
            println!("  framing_errors         {}", self.uart_framing_errors);
            println!("  glitches_rejected      {}", self.uart_glitches_rejected);
            println!(
                "  delivery_ratio         {:.2}%",
                self.uart_delivery_ratio() * 100.0
            );
            println!("----------------------------------------------------------");
        }

        if want("spi") {
            println!("SPI");
            println!("  transfers              {}", self.spi_transfers);
            println!("  slave_bytes            {}", self.spi_slave_bytes);
            println!("==========================================================");
        }
    }

    /// Prints every section to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
