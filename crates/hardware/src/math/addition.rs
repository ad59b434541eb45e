//! Signed integer addition.
//!
//! `add` wraps on overflow rather than panicking, so the result is identical
//! in debug and release builds. Callers that need to detect overflow use
//! `checked_add` or `overflowing_add`.

use crate::common::MathError;

/// Signed integer types that support the crate's addition operations.
pub trait Addition: Copy + Sized {
    /// Type name used in error messages.
    const TYPE_NAME: &'static str;

    /// Returns `self + rhs`, wrapping around at the type boundary.
    fn add_wrapping(self, rhs: Self) -> Self;

    /// Returns the wrapped sum and whether the exact sum overflowed.
    fn add_overflowing(self, rhs: Self) -> (Self, bool);

    /// Returns the exact sum, or [`MathError::Overflow`] if it is not representable.
    ///
    /// # Errors
    ///
    /// Returns [`MathError::Overflow`] when `self + rhs` does not fit in `Self`.
    fn add_checked(self, rhs: Self) -> Result<Self, MathError>;
}

macro_rules! impl_addition {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Addition for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                #[inline]
                fn add_wrapping(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn add_overflowing(self, rhs: Self) -> (Self, bool) {
                    self.overflowing_add(rhs)
                }

                #[inline]
                fn add_checked(self, rhs: Self) -> Result<Self, MathError> {
                    self.checked_add(rhs).ok_or(MathError::Overflow {
                        a: self as i128,
                        b: rhs as i128,
                        ty: Self::TYPE_NAME,
                    })
                }
            }
        )*
    };
}

impl_addition!(i8, i16, i32, i64, i128, isize);

/// Adds two integers.
///
/// Overflow wraps in two's complement: `add(i32::MAX, 1) == i32::MIN`.
///
/// # Examples
///
/// ```
/// use logicbench_core::math::add;
///
/// assert_eq!(add(2, 3), 5);
/// assert_eq!(add(-5, -7), -12);
/// assert_eq!(add(i32::MAX, 0), i32::MAX);
/// ```
#[inline]
pub const fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Adds two integers, failing if the sum is not representable.
///
/// # Errors
///
/// Returns [`MathError::Overflow`] when `a + b` falls outside `i32`.
///
/// # Examples
///
/// ```
/// use logicbench_core::math::checked_add;
///
/// assert_eq!(checked_add(40, 2), Ok(42));
/// assert!(checked_add(i32::MAX, 1).is_err());
/// ```
#[inline]
pub fn checked_add(a: i32, b: i32) -> Result<i32, MathError> {
    a.add_checked(b)
}

/// Adds two integers, returning the wrapped sum and an overflow flag.
#[inline]
pub const fn overflowing_add(a: i32, b: i32) -> (i32, bool) {
    a.overflowing_add(b)
}
