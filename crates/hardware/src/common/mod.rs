//! Common types shared across the models, the testbench and the arithmetic library.
//!
//! This module provides:
//! 1. **Constants:** Line levels and protocol framing sizes.
//! 2. **Error Handling:** `thiserror` enums for arithmetic, configuration and simulation failures.
//! 3. **Signals:** Small clocked primitives (synchronizer, edge detector) reused by the models.

/// Line levels and framing constants.
pub mod constants;

/// Error types for every fallible operation in the crate.
pub mod error;

/// Clocked signal-conditioning primitives.
pub mod signal;

pub use constants::{LINE_IDLE, LINE_MARK, LINE_SPACE};
pub use error::{ConfigError, MathError, SimError};
pub use signal::{EdgeDetector, Synchronizer};
