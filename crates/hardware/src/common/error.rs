//! Error types.
//!
//! Each layer owns one enum:
//! 1. [`MathError`] for the arithmetic library.
//! 2. [`ConfigError`] for loading and validating [`Config`](crate::config::Config).
//! 3. [`SimError`] for testbench runs; configuration failures convert into it.
//!
//! A UART framing error is not listed here. The receiver reports it on its
//! `error` output like the hardware does, and the testbench surfaces it as
//! [`UartFrame::FramingError`](crate::sim::UartFrame::FramingError).

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a checked arithmetic operation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MathError {
    /// The exact sum does not fit in the operand type.
    #[error("integer overflow: {a} + {b} does not fit in {ty}")]
    Overflow {
        /// Left operand, widened to `i128`.
        a: i128,
        /// Right operand, widened to `i128`.
        b: i128,
        /// Operand type name (e.g. `i32`).
        ty: &'static str,
    },
}

/// Failure to load or validate a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The JSON text did not match the configuration schema.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field held a value outside its legal range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field (e.g. `uart.baud_rate`).
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Failure of a testbench run.
#[derive(Debug, Error)]
pub enum SimError {
    /// A wait exceeded `sim.max_cycles`.
    #[error("timed out after {cycles} cycles waiting for {waiting_for}")]
    Timeout {
        /// Condition the testbench was waiting on.
        waiting_for: &'static str,
        /// Cycles spent before giving up.
        cycles: u64,
    },

    /// A transfer was requested while the peripheral was still busy.
    #[error("{device} is busy")]
    Busy {
        /// Instance name of the busy peripheral.
        device: String,
    },

    /// The testbench configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
