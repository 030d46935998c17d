use serde::{Deserialize, Serialize};
use crate::Scalar;

/// Sanitizes elapsed-time inputs before they reach the solver.
///
/// A stalled display callback (backgrounded window, debugger pause) can hand
/// over a multi-second dt; integrating that in one step teleports the rover.
/// Interactive front ends usually tighten `max_dt` well below the default.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickPolicy {
    /// Largest dt accepted per tick (seconds).
    pub max_dt: Scalar,
}

impl Default for TickPolicy {
    fn default() -> Self { Self { max_dt: 1.0 } }
}

impl TickPolicy {
    /// Maps NaN and negative input to zero and caps at `max_dt`.
    #[inline]
    pub fn clamp(&self, dt: Scalar) -> Scalar {
        let cap = if self.max_dt.is_finite() && self.max_dt > 0.0 { self.max_dt } else { 0.0 };
        if dt.is_nan() || dt <= 0.0 { 0.0 } else { dt.min(cap) }
    }
}
