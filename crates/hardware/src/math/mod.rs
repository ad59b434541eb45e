//! Integer arithmetic library.
//!
//! The public surface is a single operation, addition, in three flavours:
//! - [`add`]: wrapping two's-complement sum; never panics.
//! - [`checked_add`]: exact sum or [`MathError::Overflow`](crate::common::MathError::Overflow).
//! - [`overflowing_add`]: wrapped sum plus an overflow flag.
//!
//! The free functions operate on `i32`, the platform `int`. The [`Addition`]
//! trait provides the same operations for every signed primitive width.

/// Addition over the signed primitive integers.
pub mod addition;

pub use addition::{Addition, add, checked_add, overflowing_add};
