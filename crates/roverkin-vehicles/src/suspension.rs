//! Passive rocker articulation.
//!
//! Each side measures the terrain slope under its own wheel track and
//! reports it relative to the chassis pitch, scaled by a coupling factor, so
//! the rocker appears to float against the body rather than turn with it.
//! Sides are independent here; a real rocker-bogie ties them through a
//! differential bar, which this model leaves out.

use roverkin_core::Scalar;
use roverkin_terrain::Terrain;
use serde::Serialize;

use crate::{RoverParams, VehiclePose};

/// Rocker joint angles, radians, positive = front wheel up relative to chassis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct SuspensionState {
    /// Rocker on the +z track.
    pub left: Scalar,
    /// Rocker on the -z track.
    pub right: Scalar,
}

impl SuspensionState {
    /// Derive both rocker angles from `pose`. Both sides sample symmetrically
    /// about the chassis center.
    pub fn solve<T: Terrain>(terrain: &T, params: &RoverParams, pose: &VehiclePose) -> Self {
        let z = pose.position.z;
        Self {
            left: side_angle(terrain, params, pose, z + params.track_offset),
            right: side_angle(terrain, params, pose, z - params.track_offset),
        }
    }
}

/// Raw slope along one wheel track, world frame.
pub fn track_slope<T: Terrain>(terrain: &T, params: &RoverParams, x: Scalar, track_z: Scalar) -> Scalar {
    let front = terrain.height(x + params.half_wheelbase, track_z);
    let rear = terrain.height(x - params.half_wheelbase, track_z);
    let a = (front - rear).atan2(2.0 * params.half_wheelbase);
    if a.is_finite() { a } else { 0.0 }
}

fn side_angle<T: Terrain>(terrain: &T, params: &RoverParams, pose: &VehiclePose, track_z: Scalar) -> Scalar {
    let raw = track_slope(terrain, params, pose.position.x, track_z);
    (raw - pose.pitch) * params.rocker_coupling
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::Vec3;
    use roverkin_terrain::{FlatTerrain, FnTerrain};

    fn pose_at(x: f32, pitch: f32) -> VehiclePose {
        VehiclePose { position: Vec3::new(x, 0.0, 0.0), pitch, roll: 0.0 }
    }

    #[test] fn flat_ground_is_neutral() {
        let s = SuspensionState::solve(&FlatTerrain { y: -0.4 }, &RoverParams::default(), &pose_at(5.0, 0.0));
        assert_eq!(s, SuspensionState { left: 0.0, right: 0.0 });
    }

    #[test] fn measured_relative_to_chassis() {
        // Uniform ramp: chassis pitched to match sees no rocker deflection.
        let ramp = FnTerrain(|x: f32, _z: f32| 0.25 * x);
        let p = RoverParams::default();
        let pitch = 0.25f32.atan();
        let s = SuspensionState::solve(&ramp, &p, &pose_at(0.0, pitch));
        assert_abs_diff_eq!(s.left, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s.right, 0.0, epsilon = 1e-6);

        // Level chassis on the same ramp: coupled fraction of the slope.
        let s = SuspensionState::solve(&ramp, &p, &pose_at(0.0, 0.0));
        assert_abs_diff_eq!(s.left, pitch * p.rocker_coupling, epsilon = 1e-6);
    }

    #[test] fn sides_are_independent() {
        let p = RoverParams::default();
        // Slope only on the +z half, beyond the centerline probes.
        let lumpy = FnTerrain(|x: f32, z: f32| if z > 0.4 { 0.5 * x } else { 0.0 });
        let s = SuspensionState::solve(&lumpy, &p, &pose_at(2.0, 0.0));
        assert!(s.left > 0.1);
        assert_eq!(s.right, 0.0);

        let mirrored = FnTerrain(|x: f32, z: f32| if z < -0.4 { 0.5 * x } else { 0.0 });
        let m = SuspensionState::solve(&mirrored, &p, &pose_at(2.0, 0.0));
        assert_eq!(m.left, 0.0);
        assert_eq!(m.right, s.left);
    }
}
