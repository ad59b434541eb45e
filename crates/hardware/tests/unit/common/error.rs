//! # Error Tests
//!
//! Display text and conversions of the error enums.

use logicbench_core::common::{ConfigError, MathError, SimError};

#[test]
fn test_math_overflow_display() {
    let err = MathError::Overflow {
        a: 127,
        b: 1,
        ty: "i8",
    };
    assert_eq!(err.to_string(), "integer overflow: 127 + 1 does not fit in i8");
}

#[test]
fn test_config_invalid_value_display() {
    let err = ConfigError::InvalidValue {
        field: "uart.baud_rate",
        reason: "must be non-zero".into(),
    };
    assert_eq!(
        err.to_string(),
        "invalid value for uart.baud_rate: must be non-zero"
    );
}

#[test]
fn test_sim_timeout_display() {
    let err = SimError::Timeout {
        waiting_for: "spi ready",
        cycles: 10,
    };
    assert_eq!(err.to_string(), "timed out after 10 cycles waiting for spi ready");
}

#[test]
fn test_sim_busy_display() {
    let err = SimError::Busy {
        device: "uart_tx0".into(),
    };
    assert_eq!(err.to_string(), "uart_tx0 is busy");
}

#[test]
fn test_config_error_converts_into_sim_error() {
    let config_err = ConfigError::InvalidValue {
        field: "spi.clock_div",
        reason: "must be at least 1".into(),
    };
    let message = config_err.to_string();
    let sim_err: SimError = config_err.into();
    assert!(matches!(sim_err, SimError::Config(_)));
    assert_eq!(sim_err.to_string(), message);
}
