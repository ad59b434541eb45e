//! Configuration for the peripheral models and the testbench.
//!
//! This module defines all configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline clock, baud and SPI timing constants.
//! 2. **Structures:** Hierarchical config for the UART, the SPI master and the simulation loop.
//! 3. **Validation:** Range checks run after every load so the models can trust their parameters.
//!
//! Configuration is supplied as JSON (`Config::from_json` / `Config::from_file`) or
//! built from `Config::default()`. Every field may be omitted.

use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{
    UART_MAX_DATA_BITS, UART_MAX_STOP_BITS, UART_MIN_DATA_BITS, UART_MIN_OVERSAMPLE,
    UART_MIN_STOP_BITS,
};
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// System clock feeding every model (50 MHz).
    pub const CLOCK_HZ: u64 = 50_000_000;

    /// UART line rate in bits per second.
    pub const BAUD_RATE: u64 = 115_200;

    /// Receiver sample ticks per bit period.
    pub const OVERSAMPLE: u32 = 16;

    /// Data bits per UART frame.
    pub const DATA_BITS: u8 = 8;

    /// Stop bits per UART frame.
    pub const STOP_BITS: u8 = 1;

    /// System clocks per SCLK half period.
    pub const SPI_CLOCK_DIV: u32 = 4;

    /// Upper bound on the cycles any single wait may take.
    pub const MAX_CYCLES: u64 = 1_000_000;

    /// Clocks `rst_n` is held low by `Testbench::reset`.
    pub const RESET_CYCLES: u64 = 2;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use logicbench_core::config::Config;
///
/// let config = Config::from_json(r#"{ "uart": { "baud_rate": 9600 }, "spi": { "cpha": true } }"#)
///     .unwrap();
/// assert_eq!(config.uart.baud_rate, 9600);
/// assert_eq!(config.uart.oversample, 16);
/// assert!(config.spi.cpha);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// UART transmitter/receiver settings
    #[serde(default)]
    pub uart: UartConfig,
    /// SPI master settings
    #[serde(default)]
    pub spi: SpiConfig,
    /// Simulation loop settings
    #[serde(default)]
    pub sim: SimConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidValue`] for out-of-range fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::InvalidValue`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.uart.validate()?;
        self.spi.validate()?;
        self.sim.validate()
    }
}

/// UART framing and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UartConfig {
    /// System clock frequency in Hz
    #[serde(default = "UartConfig::default_clock_hz")]
    pub clock_hz: u64,

    /// Line rate in bits per second
    #[serde(default = "UartConfig::default_baud_rate")]
    pub baud_rate: u64,

    /// Receiver sample ticks per bit
    #[serde(default = "UartConfig::default_oversample")]
    pub oversample: u32,

    /// Data bits per frame (5..=8)
    #[serde(default = "UartConfig::default_data_bits")]
    pub data_bits: u8,

    /// Stop bits per frame (1 or 2)
    #[serde(default = "UartConfig::default_stop_bits")]
    pub stop_bits: u8,
}

impl UartConfig {
    fn default_clock_hz() -> u64 {
        defaults::CLOCK_HZ
    }

    fn default_baud_rate() -> u64 {
        defaults::BAUD_RATE
    }

    fn default_oversample() -> u32 {
        defaults::OVERSAMPLE
    }

    fn default_data_bits() -> u8 {
        defaults::DATA_BITS
    }

    fn default_stop_bits() -> u8 {
        defaults::STOP_BITS
    }

    /// Returns the number of system clocks between two sample ticks.
    ///
    /// Rounded to the nearest integer and never less than one.
    pub fn sample_divisor(&self) -> u64 {
        let Some(ticks_per_second) = self.ticks_per_second().filter(|&t| t != 0) else {
            return 1;
        };
        let quotient = self.clock_hz / ticks_per_second;
        let remainder = self.clock_hz % ticks_per_second;
        let round_up = remainder >= ticks_per_second - ticks_per_second / 2;
        (quotient + u64::from(round_up)).max(1)
    }

    /// Returns the number of system clocks in one bit period.
    pub fn clocks_per_bit(&self) -> u64 {
        self.sample_divisor().saturating_mul(u64::from(self.oversample))
    }

    /// Sample ticks per second, or `None` if that does not fit in a `u64`.
    fn ticks_per_second(&self) -> Option<u64> {
        self.baud_rate.checked_mul(u64::from(self.oversample))
    }

    /// Returns the baud rate actually produced by the rounded divisor.
    pub fn effective_baud(&self) -> f64 {
        self.clock_hz as f64 / self.clocks_per_bit() as f64
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.baud_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "uart.baud_rate",
                reason: "must be non-zero".into(),
            });
        }
        if self.oversample < UART_MIN_OVERSAMPLE {
            return Err(ConfigError::InvalidValue {
                field: "uart.oversample",
                reason: format!("must be at least {UART_MIN_OVERSAMPLE}"),
            });
        }
        let Some(ticks_per_second) = self.ticks_per_second() else {
            return Err(ConfigError::InvalidValue {
                field: "uart.baud_rate",
                reason: format!(
                    "{} baud at {}x oversampling overflows the tick rate",
                    self.baud_rate, self.oversample
                ),
            });
        };
        if self.clock_hz < ticks_per_second {
            return Err(ConfigError::InvalidValue {
                field: "uart.clock_hz",
                reason: format!(
                    "{} Hz is too slow for {} baud at {}x oversampling",
                    self.clock_hz, self.baud_rate, self.oversample
                ),
            });
        }
        if !(UART_MIN_DATA_BITS..=UART_MAX_DATA_BITS).contains(&self.data_bits) {
            return Err(ConfigError::InvalidValue {
                field: "uart.data_bits",
                reason: format!(
                    "{} is outside {UART_MIN_DATA_BITS}..={UART_MAX_DATA_BITS}",
                    self.data_bits
                ),
            });
        }
        if !(UART_MIN_STOP_BITS..=UART_MAX_STOP_BITS).contains(&self.stop_bits) {
            return Err(ConfigError::InvalidValue {
                field: "uart.stop_bits",
                reason: format!(
                    "{} is outside {UART_MIN_STOP_BITS}..={UART_MAX_STOP_BITS}",
                    self.stop_bits
                ),
            });
        }
        Ok(())
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            clock_hz: defaults::CLOCK_HZ,
            baud_rate: defaults::BAUD_RATE,
            oversample: defaults::OVERSAMPLE,
            data_bits: defaults::DATA_BITS,
            stop_bits: defaults::STOP_BITS,
        }
    }
}

/// SPI master clocking and bit order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpiConfig {
    /// System clocks per SCLK half period
    #[serde(default = "SpiConfig::default_clock_div")]
    pub clock_div: u32,

    /// Clock polarity: SCLK idle level
    #[serde(default)]
    pub cpol: bool,

    /// Clock phase: `false` samples on the leading edge, `true` on the trailing edge
    #[serde(default)]
    pub cpha: bool,

    /// Shift the most significant bit first
    #[serde(default = "SpiConfig::default_msb_first")]
    pub msb_first: bool,
}

impl SpiConfig {
    fn default_clock_div() -> u32 {
        defaults::SPI_CLOCK_DIV
    }

    fn default_msb_first() -> bool {
        true
    }

    /// Returns the SPI mode number (0-3) formed from CPOL and CPHA.
    pub const fn mode(&self) -> u8 {
        ((self.cpol as u8) << 1) | self.cpha as u8
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_div == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spi.clock_div",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            clock_div: defaults::SPI_CLOCK_DIV,
            cpol: false,
            cpha: false,
            msb_first: true,
        }
    }
}

/// Simulation loop bounds and tracing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Upper bound on cycles for any single wait
    #[serde(default = "SimConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Clocks `rst_n` is held low on reset
    #[serde(default = "SimConfig::default_reset_cycles")]
    pub reset_cycles: u64,

    /// Emit a `trace` event with every wire level on each clock
    #[serde(default)]
    pub trace: bool,
}

impl SimConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }

    fn default_reset_cycles() -> u64 {
        defaults::RESET_CYCLES
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cycles == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sim.max_cycles",
                reason: "must be non-zero".into(),
            });
        }
        if self.reset_cycles == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sim.reset_cycles",
                reason: "a synchronous reset needs at least one clock".into(),
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_cycles: defaults::MAX_CYCLES,
            reset_cycles: defaults::RESET_CYCLES,
            trace: false,
        }
    }
}
