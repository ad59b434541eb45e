//! Clocked signal-conditioning primitives.
//!
//! These are the building blocks the peripheral models place in front of
//! asynchronous inputs. Each one updates exactly once per rising edge.

/// Two-flop synchronizer for an asynchronous input.
///
/// The output lags the input by two clocks, the same latency a pair of
/// back-to-back flip-flops adds in hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Synchronizer {
    meta: bool,
    stable: bool,
}

impl Synchronizer {
    /// Creates a synchronizer whose both stages hold `level`.
    pub const fn new(level: bool) -> Self {
        Self {
            meta: level,
            stable: level,
        }
    }

    /// Clocks `input` into the first stage and returns the second stage.
    pub const fn clock(&mut self, input: bool) -> bool {
        self.stable = self.meta;
        self.meta = input;
        self.stable
    }

    /// Returns the synchronized level without clocking.
    pub const fn level(&self) -> bool {
        self.stable
    }

    /// Forces both stages to `level`.
    pub const fn reset(&mut self, level: bool) {
        self.meta = level;
        self.stable = level;
    }
}

/// Registered edge detector.
///
/// Remembers the level seen on the previous clock and reports transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeDetector {
    prev: bool,
}

impl EdgeDetector {
    /// Creates a detector that assumes the signal previously sat at `level`.
    pub const fn new(level: bool) -> Self {
        Self { prev: level }
    }

    /// Samples `level`; returns `true` on a high-to-low transition.
    pub const fn falling(&mut self, level: bool) -> bool {
        let fell = self.prev && !level;
        self.prev = level;
        fell
    }

    /// Samples `level`; returns `true` on a low-to-high transition.
    pub const fn rising(&mut self, level: bool) -> bool {
        let rose = !self.prev && level;
        self.prev = level;
        rose
    }

    /// Forces the remembered level.
    pub const fn reset(&mut self, level: bool) {
        self.prev = level;
    }
}
