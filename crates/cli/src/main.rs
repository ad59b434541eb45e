//! logicbench command-line front end.
//!
//! This binary exposes each part of the library as a subcommand. It performs:
//! 1. **add:** Integer addition, wrapping by default or checked with `--checked`.
//! 2. **uart:** Loops bytes through the UART transmitter/receiver pair and reports each frame.
//! 3. **spi:** Runs one SPI master/slave exchange.
//!
//! Every subcommand exits with status 0 on success and 1 on the first failure.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use logicbench_core::common::{ConfigError, MathError, SimError};
use logicbench_core::config::Config;
use logicbench_core::math;
use logicbench_core::sim::{Testbench, UartFrame};

/// Failure of a subcommand; the library error stays reachable through `source()`.
#[derive(Debug, Error)]
enum CliError {
    #[error("addition failed")]
    Math(#[from] MathError),
    #[error("could not load configuration")]
    Config(#[from] ConfigError),
    #[error("simulation failed")]
    Sim(#[from] SimError),
    #[error("{count} framing error(s) on UART loopback")]
    Framing { count: usize },
}

#[derive(Parser, Debug)]
#[command(
    name = "lbsim",
    author,
    version,
    about = "Cycle-level UART/SPI testbench and integer arithmetic",
    long_about = "Run the arithmetic library or drive the peripheral models.\n\nExamples:\n  lbsim add 2 3\n  lbsim add 2147483647 1 --checked\n  lbsim uart 0x48 0x69\n  lbsim spi 0xA5 --response 0x3C --config bench.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add two integers.
    Add {
        /// First addend.
        #[arg(allow_negative_numbers = true)]
        a: i32,
        /// Second addend.
        #[arg(allow_negative_numbers = true)]
        b: i32,
        /// Fail on overflow instead of wrapping.
        #[arg(long)]
        checked: bool,
    },

    /// Send bytes through the UART loopback.
    Uart {
        /// Bytes to send (decimal or 0x-prefixed hex).
        #[arg(required = true, value_parser = parse_byte)]
        bytes: Vec<u8>,
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print results as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Run one SPI exchange against the slave model.
    Spi {
        /// Byte the master sends (decimal or 0x-prefixed hex).
        #[arg(value_parser = parse_byte)]
        byte: u8,
        /// Byte the slave answers with.
        #[arg(short, long, default_value = "0", value_parser = parse_byte)]
        response: u8,
        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Add { a, b, checked } => cmd_add(a, b, checked),
        Commands::Uart {
            bytes,
            config,
            json,
        } => cmd_uart(&bytes, config.as_deref(), json),
        Commands::Spi {
            byte,
            response,
            config,
        } => cmd_spi(byte, response, config.as_deref()),
    };

    if let Err(err) = result {
        let message = error_chain(&err);
        error!("{message}");
        eprintln!("[!] {message}");
        process::exit(1);
    }
}

/// Joins an error and every `source()` below it with `": "`.
///
/// A cause whose text already ends the message is not repeated.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Parses a byte written in decimal or with a `0x` prefix.
fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .map_or_else(|| s.parse::<u8>(), |hex| u8::from_str_radix(hex, 16));
    parsed.map_err(|e| format!("'{s}' is not a byte: {e}"))
}

/// Loads the configuration file if given, otherwise the defaults.
fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    path.map_or_else(|| Ok(Config::default()), Config::from_file)
}

fn cmd_add(a: i32, b: i32, checked: bool) -> Result<(), CliError> {
    let sum = if checked {
        math::checked_add(a, b)?
    } else {
        math::add(a, b)
    };
    println!("{sum}");
    Ok(())
}

/// Sends every byte through the loopback; a framing error fails the command.
fn cmd_uart(bytes: &[u8], config: Option<&Path>, json: bool) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mut bench = Testbench::new(config)?;
    bench.reset();

    let frames = bench.uart_send_all(bytes)?;

    if json {
        let rows: Vec<_> = bytes
            .iter()
            .zip(&frames)
            .map(|(sent, frame)| match frame {
                UartFrame::Data(d) => serde_json::json!({ "sent": sent, "received": d }),
                UartFrame::FramingError => {
                    serde_json::json!({ "sent": sent, "error": "framing" })
                }
            })
            .collect();
        let doc = serde_json::json!({ "frames": rows, "cycles": bench.cycle() });
        println!("{doc}");
    } else {
        for (sent, frame) in bytes.iter().zip(&frames) {
            match frame {
                UartFrame::Data(d) => println!("{sent:#04x} -> {d:#04x}"),
                UartFrame::FramingError => println!("{sent:#04x} -> framing error"),
            }
        }
        bench.stats().print_sections(&["summary".into(), "uart".into()]);
    }

    let count = frames
        .iter()
        .filter(|&&f| f == UartFrame::FramingError)
        .count();
    if count > 0 {
        return Err(CliError::Framing { count });
    }
    Ok(())
}

fn cmd_spi(byte: u8, response: u8, config: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config)?;
    let mode = config.spi.mode();
    let mut bench = Testbench::new(config)?;
    bench.reset();

    let exchange = bench.spi_transfer(byte, response)?;

    println!(
        "mode {mode}: master sent {:#04x}, received {:#04x} in {} cycles",
        exchange.sent, exchange.received, exchange.cycles
    );
    match exchange.slave_received {
        Some(b) => println!("slave received {b:#04x}"),
        None => println!("slave received nothing"),
    }
    bench.stats().print_sections(&["summary".into(), "spi".into()]);
    Ok(())
}
