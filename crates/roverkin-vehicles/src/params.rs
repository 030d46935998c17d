//! Rover geometry and motion constants.

use roverkin_core::Scalar;
use serde::{Deserialize, Serialize};

/// Fixed rover description. Units: meters, seconds, radians.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverParams {
    // ---- MOTION ----
    /// Nominal forward speed along +x (m/s).
    pub speed: Scalar,
    /// Start of the closed-loop traverse; also where the rover spawns.
    pub travel_min: Scalar,
    /// Crossing this x sends the rover back to `travel_min`.
    pub travel_max: Scalar,
    /// Lateral coordinate of the traverse line.
    pub lane_z: Scalar,

    // ---- ATTITUDE ----
    /// Fore/aft distance of the pitch probes from the chassis center.
    pub pitch_probe: Scalar,
    /// Left/right distance of the roll probes from the chassis center.
    pub roll_probe: Scalar,
    /// Low-pass rate pulling pitch/roll toward the terrain slope (1/s).
    pub attitude_rate: Scalar,

    // ---- SUSPENSION GEOMETRY ----
    /// Vertical drop from chassis origin to the rocker pivot.
    pub rocker_pivot_drop: Scalar,
    /// Vertical drop from rocker pivot to the wheel axles.
    pub wheel_pivot_drop: Scalar,
    /// Wheel radius.
    pub wheel_radius: Scalar,
    /// Static sag subtracted from the stack-up so wheels read as loaded.
    pub compression_bias: Scalar,
    /// Half the distance between front and rear axles of one side.
    pub half_wheelbase: Scalar,
    /// Lateral distance from the centerline to each wheel track.
    pub track_offset: Scalar,
    /// Fraction of the relative side slope passed to the rocker joint (< 1).
    pub rocker_coupling: Scalar,
}

impl Default for RoverParams {
    fn default() -> Self {
        Self {
            speed: 0.8,
            travel_min: -40.0,
            travel_max: 40.0,
            lane_z: 0.0,
            pitch_probe: 1.0,
            roll_probe: 0.8,
            attitude_rate: 4.0,
            rocker_pivot_drop: 0.35,
            wheel_pivot_drop: 0.30,
            wheel_radius: 0.25,
            compression_bias: 0.05,
            half_wheelbase: 0.9,
            track_offset: 0.75,
            rocker_coupling: 0.6,
        }
    }
}

impl RoverParams {
    /// Height of the chassis origin above the ground under its center.
    #[inline]
    pub fn ground_clearance(&self) -> Scalar {
        self.rocker_pivot_drop + self.wheel_pivot_drop + self.wheel_radius - self.compression_bias
    }
}
