//! # Baud Generator Tests

use logicbench_core::config::UartConfig;
use logicbench_core::periph::Clocked;
use logicbench_core::sim::{BaudGenerator, BaudInputs};

const RUN: BaudInputs = BaudInputs { rst_n: true };

fn uart(clock_hz: u64, baud_rate: u64, oversample: u32) -> UartConfig {
    UartConfig {
        clock_hz,
        baud_rate,
        oversample,
        ..UartConfig::default()
    }
}

/// Clocks the generator `n` times and returns the 1-based cycles of each tick kind.
fn tick_cycles(generator: &mut BaudGenerator, n: u64) -> (Vec<u64>, Vec<u64>) {
    let mut samples = Vec::new();
    let mut bauds = Vec::new();
    for cycle in 1..=n {
        generator.clock(&RUN);
        let ticks = generator.outputs();
        if ticks.sample {
            samples.push(cycle);
        }
        if ticks.baud {
            bauds.push(cycle);
        }
    }
    (samples, bauds)
}

#[test]
fn baud_divisor_from_config() {
    let generator = BaudGenerator::new(&uart(1_200, 100, 4));
    assert_eq!(generator.divisor(), 3);
    assert_eq!(generator.clocks_per_bit(), 12);
}

#[test]
fn baud_sample_and_bit_ticks_are_evenly_spaced() {
    let mut generator = BaudGenerator::new(&uart(1_200, 100, 4));
    let (samples, bauds) = tick_cycles(&mut generator, 24);
    assert_eq!(samples, [3, 6, 9, 12, 15, 18, 21, 24]);
    assert_eq!(bauds, [12, 24]);
}

#[test]
fn baud_ticks_last_one_clock() {
    let mut generator = BaudGenerator::new(&uart(1_200, 100, 4));
    generator.clock(&RUN);
    generator.clock(&RUN);
    generator.clock(&RUN);
    assert!(generator.outputs().sample);
    generator.clock(&RUN);
    assert!(!generator.outputs().sample);
}

#[test]
fn baud_divisor_one_ticks_every_clock() {
    let mut generator = BaudGenerator::new(&uart(1_600, 100, 16));
    let (samples, bauds) = tick_cycles(&mut generator, 32);
    assert_eq!(samples.len(), 32);
    assert_eq!(bauds, [16, 32]);
}

#[test]
fn baud_reset_restarts_the_divider() {
    let mut generator = BaudGenerator::new(&uart(1_200, 100, 4));
    generator.clock(&RUN);
    generator.clock(&RUN);
    generator.clock(&BaudInputs { rst_n: false });
    assert!(!generator.outputs().sample);

    let (samples, _) = tick_cycles(&mut generator, 6);
    assert_eq!(samples, [3, 6]);
}
