//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

/// Clamp a value into the inclusive range `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: T, min: T, max: T) -> T 
where
    T: Float
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle in radians into the range (-pi, pi].
///
/// The result is the shortest signed rotation equivalent to `angle`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    let pi_t = T::PI();
    let tau_t = pi_t + pi_t;

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid lands on [-pi, pi), fold the lower bound onto +pi
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}
