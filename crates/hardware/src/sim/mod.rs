//! Simulation testbench.
//!
//! Composes the peripheral models into a runnable system:
//! 1. **Timing:** [`BaudGenerator`] divides the system clock into sample and bit ticks.
//! 2. **Loopback:** [`UartTx`](crate::periph::UartTx) drives [`UartRx`](crate::periph::UartRx) over a simulated wire.
//! 3. **SPI:** [`SpiMaster`](crate::periph::SpiMaster) exchanges bytes with an [`SpiSlave`].
//! 4. **Control:** [`Testbench`] steps everything in lockstep, bounds every wait and collects stats.

/// Baud-rate generator.
pub mod baud;

/// Behavioural SPI slave.
pub mod spi_slave;

/// Testbench driving all models from one clock.
pub mod testbench;

pub use baud::{BaudGenerator, BaudInputs, BaudTicks};
pub use spi_slave::{SpiSlave, SpiSlaveInputs, SpiSlaveOutputs};
pub use testbench::{SpiExchange, Testbench, UartFrame, uart_frame_bits};
