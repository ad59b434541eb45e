//! # Configuration Tests
//!
//! Defaults, JSON deserialization, file loading and validation.

use std::io::Write;

use logicbench_core::common::ConfigError;
use logicbench_core::config::*;
use logicbench_core::sim::Testbench;
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn test_uart_config_defaults() {
    let uart = UartConfig::default();
    assert_eq!(uart.clock_hz, 50_000_000);
    assert_eq!(uart.baud_rate, 115_200);
    assert_eq!(uart.oversample, 16);
    assert_eq!(uart.data_bits, 8);
    assert_eq!(uart.stop_bits, 1);
}

#[test]
fn test_spi_config_defaults() {
    let spi = SpiConfig::default();
    assert_eq!(spi.clock_div, 4);
    assert!(!spi.cpol);
    assert!(!spi.cpha);
    assert!(spi.msb_first);
    assert_eq!(spi.mode(), 0);
}

#[test]
fn test_sim_config_defaults() {
    let sim = SimConfig::default();
    assert_eq!(sim.max_cycles, 1_000_000);
    assert_eq!(sim.reset_cycles, 2);
    assert!(!sim.trace);
}

#[test]
fn test_default_config_validates() {
    assert!(Config::default().validate().is_ok());
}

// ══════════════════════════════════════════════════════════
// Derived timing
// ══════════════════════════════════════════════════════════

#[test]
fn test_sample_divisor_rounds_to_nearest() {
    // 50 MHz / (115200 * 16) = 27.13
    let uart = UartConfig::default();
    assert_eq!(uart.sample_divisor(), 27);
    assert_eq!(uart.clocks_per_bit(), 432);
}

#[test]
fn test_sample_divisor_rounds_up_past_half() {
    let uart = UartConfig {
        clock_hz: 1_000,
        baud_rate: 10,
        oversample: 16,
        ..UartConfig::default()
    };
    // 1000 / 160 = 6.25 -> 6
    assert_eq!(uart.sample_divisor(), 6);

    let uart = UartConfig {
        clock_hz: 1_100,
        ..uart
    };
    // 1100 / 160 = 6.875 -> 7
    assert_eq!(uart.sample_divisor(), 7);
}

#[test]
fn test_effective_baud_close_to_requested() {
    let uart = UartConfig::default();
    let error = (uart.effective_baud() - 115_200.0).abs() / 115_200.0;
    assert!(error < 0.01, "baud error {error}");
}

#[test]
fn test_spi_mode_numbers() {
    let mode = |cpol, cpha| {
        SpiConfig {
            cpol,
            cpha,
            ..SpiConfig::default()
        }
        .mode()
    };
    assert_eq!(mode(false, false), 0);
    assert_eq!(mode(false, true), 1);
    assert_eq!(mode(true, false), 2);
    assert_eq!(mode(true, true), 3);
}

// ══════════════════════════════════════════════════════════
// JSON
// ══════════════════════════════════════════════════════════

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_json_fills_defaults() {
    let config = Config::from_json(
        r#"{
            "uart": { "baud_rate": 9600, "stop_bits": 2 },
            "spi": { "cpol": true, "cpha": true, "msb_first": false },
            "sim": { "trace": true }
        }"#,
    )
    .unwrap();
    assert_eq!(config.uart.baud_rate, 9600);
    assert_eq!(config.uart.stop_bits, 2);
    assert_eq!(config.uart.clock_hz, 50_000_000);
    assert_eq!(config.spi.mode(), 3);
    assert!(!config.spi.msb_first);
    assert_eq!(config.spi.clock_div, 4);
    assert!(config.sim.trace);
    assert_eq!(config.sim.max_cycles, 1_000_000);
}

#[test]
fn test_unknown_field_rejected() {
    let err = Config::from_json(r#"{ "uart": { "parity": "even" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        Config::from_json("{ uart: "),
        Err(ConfigError::Parse(_))
    ));
}

// ══════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════

fn invalid_field(json: &str) -> &'static str {
    match Config::from_json(json) {
        Err(ConfigError::InvalidValue { field, .. }) => field,
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn test_zero_baud_rejected() {
    assert_eq!(invalid_field(r#"{ "uart": { "baud_rate": 0 } }"#), "uart.baud_rate");
}

#[test]
fn test_oversample_below_two_rejected() {
    assert_eq!(invalid_field(r#"{ "uart": { "oversample": 1 } }"#), "uart.oversample");
}

#[test]
fn test_clock_too_slow_rejected() {
    assert_eq!(
        invalid_field(r#"{ "uart": { "clock_hz": 1000, "baud_rate": 9600 } }"#),
        "uart.clock_hz"
    );
}

#[test]
fn test_data_bits_range() {
    assert_eq!(invalid_field(r#"{ "uart": { "data_bits": 4 } }"#), "uart.data_bits");
    assert_eq!(invalid_field(r#"{ "uart": { "data_bits": 9 } }"#), "uart.data_bits");
    assert!(Config::from_json(r#"{ "uart": { "data_bits": 5 } }"#).is_ok());
}

#[test]
fn test_stop_bits_range() {
    assert_eq!(invalid_field(r#"{ "uart": { "stop_bits": 0 } }"#), "uart.stop_bits");
    assert_eq!(invalid_field(r#"{ "uart": { "stop_bits": 3 } }"#), "uart.stop_bits");
}

#[test]
fn test_tick_rate_overflow_rejected() {
    assert_eq!(
        invalid_field(r#"{ "uart": { "baud_rate": 18446744073709551615 } }"#),
        "uart.baud_rate"
    );
    assert_eq!(
        invalid_field(r#"{ "uart": { "baud_rate": 4611686018427387904, "oversample": 4 } }"#),
        "uart.baud_rate"
    );
}

#[test]
fn test_huge_clock_is_accepted() {
    let json = r#"{ "uart": { "clock_hz": 18446744073709551615 } }"#;
    let config = Config::from_json(json).unwrap();
    // u64::MAX / (115200 * 16), rounded down.
    assert_eq!(config.uart.sample_divisor(), 10_007_999_171_934);
    assert!(Testbench::new(config).is_ok());
}

#[test]
fn test_timing_helpers_saturate() {
    let uart = UartConfig {
        clock_hz: u64::MAX,
        baud_rate: 1,
        oversample: 2,
        ..UartConfig::default()
    };
    assert_eq!(uart.sample_divisor(), u64::MAX / 2 + 1);
    assert_eq!(uart.clocks_per_bit(), u64::MAX);

    let unvalidated = UartConfig {
        baud_rate: u64::MAX,
        ..UartConfig::default()
    };
    assert_eq!(unvalidated.sample_divisor(), 1);
}

#[test]
fn test_zero_spi_divider_rejected() {
    assert_eq!(invalid_field(r#"{ "spi": { "clock_div": 0 } }"#), "spi.clock_div");
}

#[test]
fn test_sim_bounds_rejected() {
    assert_eq!(invalid_field(r#"{ "sim": { "max_cycles": 0 } }"#), "sim.max_cycles");
    assert_eq!(invalid_field(r#"{ "sim": { "reset_cycles": 0 } }"#), "sim.reset_cycles");
}

// ══════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════

#[test]
fn test_from_file_reads_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{ "spi": { "clock_div": 8 } }"#).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.spi.clock_div, 8);
}

#[test]
fn test_from_file_missing_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match Config::from_file(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}
