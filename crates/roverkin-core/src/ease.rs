//! Frame-rate-independent exponential approach.
//!
//! `x += (target - x) * (1 - e^{-rate * dt})` is a first-order low-pass: it
//! never overshoots, and splitting one dt into two halves lands on the same
//! value, so behavior does not depend on tick duration.

use crate::Scalar;

/// Fraction of the remaining gap closed over `dt` at `rate` (1/s). Always in [0, 1].
#[inline]
pub fn ease_factor(rate: Scalar, dt: Scalar) -> Scalar {
    // f32::max drops a NaN operand, so 0 * inf collapses to no motion.
    let k = (rate * dt).max(0.0);
    1.0 - (-k).exp()
}

#[inline]
pub fn approach(current: Scalar, target: Scalar, rate: Scalar, dt: Scalar) -> Scalar {
    current + (target - current) * ease_factor(rate, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test] fn zero_dt_is_identity() {
        assert_eq!(approach(0.3, 1.0, 5.0, 0.0), 0.3);
    }

    #[test] fn never_overshoots() {
        let mut x = 0.0;
        for _ in 0..200 {
            x = approach(x, 1.0, 50.0, 0.1);
            assert!(x <= 1.0);
        }
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-6);
    }

    #[test] fn split_steps_match_single_step() {
        let one = approach(0.0, 1.0, 3.0, 0.2);
        let two = approach(approach(0.0, 1.0, 3.0, 0.1), 1.0, 3.0, 0.1);
        assert_abs_diff_eq!(one, two, epsilon = 1e-6);
    }

    #[test] fn huge_step_saturates() {
        assert_eq!(ease_factor(4.0, 1.0e9), 1.0);
        assert_eq!(ease_factor(f32::INFINITY, 0.0), 0.0);
    }
}
