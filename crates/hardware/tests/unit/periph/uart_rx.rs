//! UART Receiver Tests.
//!
//! The receiver is clocked with a sample tick on every edge, so one bit period
//! is `oversample` clocks.

use logicbench_core::config::UartConfig;
use logicbench_core::periph::{Clocked, UartRx, UartRxInputs, UartRxState};
use logicbench_core::sim::{UartFrame, uart_frame_bits};
use rstest::rstest;

use crate::common::harness::drive_rx;

const OVERSAMPLE: u32 = 16;

fn receiver() -> UartRx {
    UartRx::new("rx", &UartConfig::default())
}

// ══════════════════════════════════════════════════════════
// Good frames
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x00)]
#[case(0xFF)]
#[case(0x55)]
#[case(0xAA)]
#[case(0x81)]
#[case(b'i')]
fn uart_rx_decodes_frame(#[case] byte: u8) {
    let mut rx = receiver();
    let frame = drive_rx(&mut rx, &uart_frame_bits(byte, 8, 1), OVERSAMPLE);
    assert_eq!(frame, Some(UartFrame::Data(byte)));
    assert_eq!(rx.outputs().data, byte);
}

#[test]
fn uart_rx_decodes_consecutive_frames() {
    let mut rx = receiver();
    let mut bits = uart_frame_bits(0x31, 8, 1);
    bits.extend(uart_frame_bits(0x32, 8, 1));

    let first = drive_rx(&mut rx, &bits, OVERSAMPLE);
    assert_eq!(first, Some(UartFrame::Data(0x31)));
    // `data` holds the last good byte.
    assert_eq!(rx.outputs().data, 0x32);
}

#[test]
fn uart_rx_seven_data_bits() {
    let config = UartConfig {
        data_bits: 7,
        ..UartConfig::default()
    };
    let mut rx = UartRx::new("rx", &config);
    let frame = drive_rx(&mut rx, &uart_frame_bits(0x5A, 7, 1), OVERSAMPLE);
    assert_eq!(frame, Some(UartFrame::Data(0x5A)));
}

#[test]
fn uart_rx_small_oversample() {
    let config = UartConfig {
        oversample: 4,
        ..UartConfig::default()
    };
    let mut rx = UartRx::new("rx", &config);
    let frame = drive_rx(&mut rx, &uart_frame_bits(0xC3, 8, 1), 4);
    assert_eq!(frame, Some(UartFrame::Data(0xC3)));
}

#[rstest]
#[case(0)]
#[case(1)]
fn uart_rx_oversample_below_two_is_raised(#[case] oversample: u32) {
    let config = UartConfig {
        oversample,
        ..UartConfig::default()
    };
    let mut rx = UartRx::new("rx", &config);

    // Two sample ticks per bit, eight clocks apart, so the start bit is
    // sampled one tick after the edge is seen.
    let idle = [true; 2];
    let bits = uart_frame_bits(0x96, 8, 1);
    let levels = idle
        .iter()
        .chain(&bits)
        .chain(&idle)
        .flat_map(|&level| std::iter::repeat_n(level, 16));

    let mut frame = None;
    for (clock, level) in levels.enumerate() {
        rx.clock(&UartRxInputs {
            rst_n: true,
            rx: level,
            sample_tick: clock % 8 == 0,
        });
        if rx.outputs().ready {
            frame = Some(rx.outputs().data);
        }
    }
    assert_eq!(frame, Some(0x96));
    assert_eq!(rx.state(), UartRxState::Idle);
}

#[test]
fn uart_rx_data_bits_above_eight_are_clamped() {
    let config = UartConfig {
        data_bits: 12,
        ..UartConfig::default()
    };
    let mut rx = UartRx::new("rx", &config);
    let frame = drive_rx(&mut rx, &uart_frame_bits(0xE7, 8, 1), OVERSAMPLE);
    assert_eq!(frame, Some(UartFrame::Data(0xE7)));
}

#[test]
fn uart_rx_ready_pulses_for_one_clock() {
    let mut rx = receiver();
    let _ = drive_rx(&mut rx, &uart_frame_bits(0x10, 8, 1), OVERSAMPLE);
    // drive_rx ends on idle line well after the frame
    assert!(!rx.outputs().ready);
    assert!(!rx.outputs().error);
    assert_eq!(rx.state(), UartRxState::Idle);
}

// ══════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════

#[test]
fn uart_rx_framing_error_on_low_stop_bit() {
    let mut rx = receiver();
    let mut bits = uart_frame_bits(0x7E, 8, 1);
    *bits.last_mut().unwrap() = false;

    let frame = drive_rx(&mut rx, &bits, OVERSAMPLE);
    assert_eq!(frame, Some(UartFrame::FramingError));
    assert_eq!(rx.outputs().data, 0, "data keeps its previous value");
}

#[test]
fn uart_rx_framing_error_keeps_previous_byte() {
    let mut rx = receiver();
    let _ = drive_rx(&mut rx, &uart_frame_bits(0x99, 8, 1), OVERSAMPLE);

    let mut bad = uart_frame_bits(0x11, 8, 1);
    *bad.last_mut().unwrap() = false;
    assert_eq!(
        drive_rx(&mut rx, &bad, OVERSAMPLE),
        Some(UartFrame::FramingError)
    );
    assert_eq!(rx.outputs().data, 0x99);
}

#[test]
fn uart_rx_rejects_short_start_glitch() {
    let mut rx = receiver();
    for level in [false, false, false, false].into_iter().chain([true; 40]) {
        rx.clock(&UartRxInputs {
            rst_n: true,
            rx: level,
            sample_tick: true,
        });
        assert!(!rx.outputs().ready);
        assert!(!rx.outputs().error);
    }
    assert_eq!(rx.glitches_rejected(), 1);
    assert_eq!(rx.state(), UartRxState::Idle);
}

#[test]
fn uart_rx_break_reports_one_error() {
    let mut rx = receiver();
    // Idle, then the line drops and stays low for twenty bit periods.
    let levels = std::iter::repeat_n(true, 48).chain(std::iter::repeat_n(false, 16 * 20));

    let mut errors = 0;
    for level in levels {
        rx.clock(&UartRxInputs {
            rst_n: true,
            rx: level,
            sample_tick: true,
        });
        if rx.outputs().error {
            errors += 1;
        }
        assert!(!rx.outputs().ready);
    }
    // No further falling edge after the first frame, so no further frames.
    assert_eq!(errors, 1);
    assert_eq!(rx.state(), UartRxState::Idle);
}

// ══════════════════════════════════════════════════════════
// Reset and ticks
// ══════════════════════════════════════════════════════════

#[test]
fn uart_rx_waits_for_sample_ticks() {
    let mut rx = receiver();
    let waveform = uart_frame_bits(0xAB, 8, 1)
        .into_iter()
        .flat_map(|level| std::iter::repeat_n(level, 16));
    for level in waveform {
        rx.clock(&UartRxInputs {
            rst_n: true,
            rx: level,
            sample_tick: false,
        });
    }
    // Without ticks the receiver never leaves Start.
    assert_eq!(rx.state(), UartRxState::Start);
}

#[test]
fn uart_rx_reset_clears_state_and_data() {
    let mut rx = receiver();
    let _ = drive_rx(&mut rx, &uart_frame_bits(0x77, 8, 1), OVERSAMPLE);
    assert_eq!(rx.outputs().data, 0x77);

    rx.clock(&UartRxInputs {
        rst_n: false,
        ..UartRxInputs::default()
    });
    assert_eq!(rx.outputs().data, 0);
    assert_eq!(rx.state(), UartRxState::Idle);
}
