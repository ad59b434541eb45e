//! Cycle-level UART/SPI models and a small integer arithmetic library.
//!
//! This crate provides:
//! 1. **Math:** `add` with explicit wrapping, checked and overflowing variants.
//! 2. **Peripherals:** Clocked models of a UART transmitter, a UART receiver and an SPI master.
//! 3. **Simulation:** A testbench with a baud generator, UART loopback and an SPI slave.
//! 4. **Support:** Configuration, error types and run statistics.

/// Common types and constants (line levels, errors, signal primitives).
pub mod common;
/// Configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Integer arithmetic (add and its checked/overflowing forms).
pub mod math;
/// Peripheral state machines (UART TX/RX, SPI master).
pub mod periph;
/// Testbench, baud generator and SPI slave model.
pub mod sim;
/// Testbench statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// The platform-`int` addition entry point.
pub use crate::math::add;
/// Top-level testbench; construct with `Testbench::new`.
pub use crate::sim::Testbench;
