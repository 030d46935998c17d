//! Appendage joints: a fixed table of (current, target, rate) records eased
//! uniformly each tick.
//!
//! Targets are written by the mission logic only; the renderer reads
//! [`AppendageAngles`] snapshots and never writes back.

use roverkin_core::{approach, Scalar};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Appendage { Manipulator, Mast }

/// Every animated joint on the rover.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum JointName {
    /// Manipulator yaw at the chassis mount.
    ArmBase,
    /// Manipulator shoulder pitch; positive raises the arm.
    ArmShoulder,
    /// Elbow pitch; negative folds the forearm toward the ground.
    ArmForearm,
    /// Mast yaw at its base.
    MastYaw,
    /// Mast mid-joint tilt.
    MastTilt,
}

pub const JOINT_COUNT: usize = 5;

impl JointName {
    pub const ALL: [JointName; JOINT_COUNT] = [
        JointName::ArmBase,
        JointName::ArmShoulder,
        JointName::ArmForearm,
        JointName::MastYaw,
        JointName::MastTilt,
    ];

    #[inline] pub fn index(self) -> usize { self as usize }

    pub fn label(self) -> &'static str {
        match self {
            JointName::ArmBase     => "arm_base",
            JointName::ArmShoulder => "arm_shoulder",
            JointName::ArmForearm  => "arm_forearm",
            JointName::MastYaw     => "mast_yaw",
            JointName::MastTilt    => "mast_tilt",
        }
    }

    pub fn appendage(self) -> Appendage {
        match self {
            JointName::ArmBase | JointName::ArmShoulder | JointName::ArmForearm => Appendage::Manipulator,
            JointName::MastYaw | JointName::MastTilt => Appendage::Mast,
        }
    }
}

/// Easing rates per appendage (1/s).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorParams {
    pub arm_rate: Scalar,
    pub mast_rate: Scalar,
}

impl Default for AnimatorParams {
    fn default() -> Self { Self { arm_rate: 2.5, mast_rate: 4.0 } }
}

impl AnimatorParams {
    pub fn rate_for(&self, j: JointName) -> Scalar {
        match j.appendage() {
            Appendage::Manipulator => self.arm_rate,
            Appendage::Mast => self.mast_rate,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct JointTrack {
    pub current: Scalar,
    pub target: Scalar,
    pub rate: Scalar,
}

impl JointTrack {
    #[inline]
    pub fn ease(&mut self, dt: Scalar) {
        self.current = approach(self.current, self.target, self.rate, dt);
    }
}

#[derive(Clone, Debug)]
pub struct JointTable {
    tracks: [JointTrack; JOINT_COUNT],
}

impl JointTable {
    /// All joints resting at `initial(j)` with that as their target.
    pub fn new(params: &AnimatorParams, initial: impl Fn(JointName) -> Scalar) -> Self {
        let mut tracks = [JointTrack::default(); JOINT_COUNT];
        for j in JointName::ALL {
            let a = initial(j);
            tracks[j.index()] = JointTrack { current: a, target: a, rate: params.rate_for(j) };
        }
        Self { tracks }
    }

    #[inline] pub fn track(&self, j: JointName) -> &JointTrack { &self.tracks[j.index()] }
    #[inline] pub fn current(&self, j: JointName) -> Scalar { self.tracks[j.index()].current }
    #[inline] pub fn target(&self, j: JointName) -> Scalar { self.tracks[j.index()].target }

    /// Non-finite targets are ignored; the previous target stays.
    pub fn set_target(&mut self, j: JointName, target: Scalar) {
        if target.is_finite() {
            self.tracks[j.index()].target = target;
        }
    }

    /// Ease every joint toward its target. `dt` must already be clamped.
    pub fn ease_all(&mut self, dt: Scalar) {
        for t in &mut self.tracks { t.ease(dt); }
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointName, &JointTrack)> + '_ {
        JointName::ALL.into_iter().zip(self.tracks.iter())
    }

    pub fn angles(&self) -> AppendageAngles {
        let mut out = AppendageAngles::default();
        for (j, t) in self.iter() {
            out.current[j.index()] = t.current;
            out.target[j.index()] = t.target;
        }
        out
    }
}

/// Immutable per-tick copy of the joint table, indexed by [`JointName::index`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct AppendageAngles {
    pub current: [Scalar; JOINT_COUNT],
    pub target: [Scalar; JOINT_COUNT],
}

impl AppendageAngles {
    #[inline] pub fn get(&self, j: JointName) -> Scalar { self.current[j.index()] }
    #[inline] pub fn target(&self, j: JointName) -> Scalar { self.target[j.index()] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test] fn indices_are_dense_and_ordered() {
        for (i, j) in JointName::ALL.iter().enumerate() {
            assert_eq!(j.index(), i);
        }
    }

    #[test] fn eases_without_overshoot() {
        let mut t = JointTable::new(&AnimatorParams::default(), |_| 0.0);
        t.set_target(JointName::ArmShoulder, 1.0);
        let mut prev = 0.0;
        for _ in 0..400 {
            t.ease_all(1.0 / 60.0);
            let c = t.current(JointName::ArmShoulder);
            assert!(c >= prev && c <= 1.0);
            prev = c;
        }
        assert_abs_diff_eq!(prev, 1.0, epsilon = 1e-4);
        // Untouched joints stay put.
        assert_eq!(t.current(JointName::MastYaw), 0.0);
    }

    #[test] fn tick_rate_independent() {
        let p = AnimatorParams::default();
        let mut coarse = JointTable::new(&p, |_| 0.0);
        let mut fine = JointTable::new(&p, |_| 0.0);
        coarse.set_target(JointName::MastTilt, -0.8);
        fine.set_target(JointName::MastTilt, -0.8);
        for _ in 0..10 { coarse.ease_all(0.1); }
        for _ in 0..100 { fine.ease_all(0.01); }
        assert_abs_diff_eq!(coarse.current(JointName::MastTilt), fine.current(JointName::MastTilt), epsilon = 1e-4);
    }

    #[test] fn rates_follow_appendage() {
        let p = AnimatorParams { arm_rate: 1.0, mast_rate: 7.0 };
        let t = JointTable::new(&p, |_| 0.0);
        assert_eq!(t.track(JointName::ArmForearm).rate, 1.0);
        assert_eq!(t.track(JointName::MastYaw).rate, 7.0);
    }

    #[test] fn rejects_non_finite_targets() {
        let mut t = JointTable::new(&AnimatorParams::default(), |_| 0.5);
        t.set_target(JointName::ArmBase, f32::NAN);
        assert_eq!(t.target(JointName::ArmBase), 0.5);
        let snap = t.angles();
        assert_eq!(snap.get(JointName::ArmBase), 0.5);
        assert_eq!(snap.target(JointName::ArmBase), 0.5);
    }
}
