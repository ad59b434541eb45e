//! Cycle-level peripheral models.
//!
//! Each model mirrors one synchronous hardware block: registers update on the
//! rising clock edge, reset is synchronous and active-low, and the ports are
//! split into an `Inputs` bundle (sampled at the edge) and an `Outputs` bundle
//! (register values after the edge).
//!
//! Models:
//! - [`UartTx`]: serializer driving the `tx` line from a `baud_tick`.
//! - [`UartRx`]: oversampling deserializer with framing-error detection.
//! - [`SpiMaster`]: full-duplex byte master for all four CPOL/CPHA modes.

/// SPI master state machine.
pub mod spi_master;

/// UART receiver state machine.
pub mod uart_rx;

/// UART transmitter state machine.
pub mod uart_tx;

pub use spi_master::{SpiMaster, SpiMasterInputs, SpiMasterOutputs, SpiState};
pub use uart_rx::{UartRx, UartRxInputs, UartRxOutputs, UartRxState};
pub use uart_tx::{UartTx, UartTxInputs, UartTxOutputs, UartTxState};

/// A synchronous block advanced one rising clock edge at a time.
///
/// Implementors hold only registered state, so `outputs` is a pure read and
/// may be called any number of times between edges.
pub trait Clocked {
    /// Port values sampled at the rising edge.
    type Inputs;
    /// Register values visible after the edge.
    type Outputs;

    /// Instance name used in trace output (e.g. `"uart_tx0"`).
    fn name(&self) -> &str;

    /// Applies one rising clock edge.
    ///
    /// When the reset input is low the block returns to its reset state and
    /// every other input is ignored.
    fn clock(&mut self, inputs: &Self::Inputs);

    /// Returns the current outputs without clocking.
    fn outputs(&self) -> Self::Outputs;
}
