//! Terrain-following chassis pose.
//!
//! Each tick the solver moves the rover along +x (when allowed), drops it
//! onto the ground at a fixed clearance, and low-pass filters pitch and roll
//! toward the slope measured by four probes around the chassis center.

use glam::Vec3;
use roverkin_core::{approach, Scalar};
use roverkin_terrain::Terrain;
use serde::Serialize;

use crate::RoverParams;

/// World pose of the chassis origin.
///
/// `position.y`, `pitch` and `roll` are derived from the terrain; only
/// [`PoseSolver`] writes them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct VehiclePose {
    /// Chassis origin in world space.
    pub position: Vec3,
    /// Nose-up rotation about the lateral (z) axis, radians.
    pub pitch: Scalar,
    /// Left-up rotation about the longitudinal (x) axis, radians.
    pub roll: Scalar,
}

/// Owns the rover pose and advances it against a terrain.
#[derive(Clone, Debug)]
pub struct PoseSolver {
    /// Geometry and motion constants.
    pub params: RoverParams,
    pose: VehiclePose,
}

#[inline]
fn finite_or(v: Scalar, fallback: Scalar) -> Scalar {
    if v.is_finite() { v } else { fallback }
}

impl PoseSolver {
    /// Rover parked at `travel_min` on the terrain, level.
    pub fn new<T: Terrain>(params: RoverParams, terrain: &T) -> Self {
        let mut s = Self { params, pose: VehiclePose::default() };
        s.place(terrain, params.travel_min);
        s
    }

    /// Current pose.
    #[inline]
    pub fn pose(&self) -> VehiclePose { self.pose }

    /// Teleport to longitudinal coordinate `x`, keeping attitude.
    pub fn place<T: Terrain>(&mut self, terrain: &T, x: Scalar) {
        let x = finite_or(x, self.params.travel_min);
        let z = self.params.lane_z;
        let y = finite_or(terrain.height(x, z), 0.0) + self.params.ground_clearance();
        self.pose.position = Vec3::new(x, y, z);
    }

    /// Slope-derived (pitch, roll) the attitude filter is chasing at (x, z).
    pub fn attitude_target<T: Terrain>(&self, terrain: &T, x: Scalar, z: Scalar) -> (Scalar, Scalar) {
        let p = &self.params;
        let fwd = terrain.height(x + p.pitch_probe, z);
        let back = terrain.height(x - p.pitch_probe, z);
        let left = terrain.height(x, z + p.roll_probe);
        let right = terrain.height(x, z - p.roll_probe);

        // atan2 keeps a zero probe distance finite.
        let pitch = (fwd - back).atan2(2.0 * p.pitch_probe);
        let roll = (left - right).atan2(2.0 * p.roll_probe);
        (finite_or(pitch, 0.0), finite_or(roll, 0.0))
    }

    /// Advance one tick. `dt` must already be clamped by the caller.
    ///
    /// When `moving` is false the rover holds its x but still re-settles
    /// height and attitude, so a paused rover keeps easing toward level.
    pub fn step<T: Terrain>(&mut self, terrain: &T, dt: Scalar, moving: bool) -> VehiclePose {
        let p = self.params;
        let mut x = self.pose.position.x;
        if moving {
            x += p.speed * dt;
            if x > p.travel_max {
                x = p.travel_min;
            }
        }
        x = finite_or(x, p.travel_min);
        let z = p.lane_z;

        let (pitch_t, roll_t) = self.attitude_target(terrain, x, z);
        let pitch = approach(self.pose.pitch, pitch_t, p.attitude_rate, dt);
        let roll = approach(self.pose.roll, roll_t, p.attitude_rate, dt);

        let y = finite_or(terrain.height(x, z), self.pose.position.y - p.ground_clearance())
            + p.ground_clearance();

        self.pose = VehiclePose {
            position: Vec3::new(x, y, z),
            pitch: finite_or(pitch, self.pose.pitch),
            roll: finite_or(roll, self.pose.roll),
        };
        self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use roverkin_terrain::{FlatTerrain, FnTerrain, ProceduralTerrain};

    #[test] fn flat_ground_levels_out() {
        let t = FlatTerrain { y: 3.0 };
        let mut s = PoseSolver::new(RoverParams::default(), &t);
        for _ in 0..50 {
            let pose = s.step(&t, 0.1, true);
            assert_eq!(pose.pitch, 0.0);
            assert_eq!(pose.roll, 0.0);
        }
        assert_abs_diff_eq!(s.pose().position.y, 3.0 + s.params.ground_clearance(), epsilon = 1e-6);
    }

    #[test] fn attitude_decays_to_level_from_tilt() {
        // Start on a ramp, then drive onto flat ground and watch pitch bleed off.
        let ramp = FnTerrain(|x: f32, _z: f32| 0.3 * x);
        let flat = FlatTerrain::default();
        let mut s = PoseSolver::new(RoverParams::default(), &ramp);
        for _ in 0..100 { s.step(&ramp, 0.05, false); }
        assert_abs_diff_eq!(s.pose().pitch, 0.3f32.atan(), epsilon = 1e-4);

        let mut prev = s.pose().pitch;
        for _ in 0..200 {
            let pitch = s.step(&flat, 0.05, false).pitch;
            assert!(pitch >= 0.0 && pitch <= prev);
            prev = pitch;
        }
        assert!(prev < 1e-6);
    }

    #[test] fn roll_sign_follows_left_side_up() {
        let bank = FnTerrain(|_x: f32, z: f32| 0.2 * z);
        let s = PoseSolver::new(RoverParams::default(), &bank);
        let (pitch, roll) = s.attitude_target(&bank, 0.0, 0.0);
        assert_abs_diff_eq!(pitch, 0.0, epsilon = 1e-6);
        assert!(roll > 0.0);
    }

    #[test] fn advances_then_wraps_to_start() {
        let t = FlatTerrain::default();
        let p = RoverParams::default();
        let mut s = PoseSolver::new(p, &t);
        s.step(&t, 1.0, true);
        assert_abs_diff_eq!(s.pose().position.x, p.travel_min + p.speed, epsilon = 1e-5);

        s.place(&t, p.travel_max - 0.1);
        let pose = s.step(&t, 1.0, true);
        assert_eq!(pose.position.x, p.travel_min);
    }

    #[test] fn holds_position_when_not_moving() {
        let t = ProceduralTerrain::default();
        let mut s = PoseSolver::new(RoverParams::default(), &t);
        let x0 = s.pose().position.x;
        for _ in 0..20 { s.step(&t, 0.1, false); }
        assert_eq!(s.pose().position.x, x0);
    }

    #[test] fn height_tracks_terrain_exactly() {
        let t = ProceduralTerrain::default();
        let mut s = PoseSolver::new(RoverParams::default(), &t);
        for _ in 0..40 {
            let pose = s.step(&t, 0.1, true);
            let expect = t.height(pose.position.x, pose.position.z) + s.params.ground_clearance();
            assert_eq!(pose.position.y, expect);
        }
    }

    #[test] fn hostile_terrain_keeps_pose_finite() {
        let nan = FnTerrain(|_x: f32, _z: f32| f32::NAN);
        let mut s = PoseSolver::new(RoverParams::default(), &nan);
        for _ in 0..10 {
            let pose = s.step(&nan, 0.1, true);
            assert!(pose.position.is_finite() && pose.pitch.is_finite() && pose.roll.is_finite());
        }
    }
}
