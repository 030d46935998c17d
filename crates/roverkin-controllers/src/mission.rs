use roverkin_articulation::{JointName, JointTable};
use roverkin_core::Scalar;
use serde::{Deserialize, Serialize};

/// Mission phases, visited in a fixed cycle with no terminal state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MissionPhase { Traverse, Scan, Sample, Return }

impl MissionPhase {
    pub fn next(self) -> Self {
        match self {
            MissionPhase::Traverse => MissionPhase::Scan,
            MissionPhase::Scan     => MissionPhase::Sample,
            MissionPhase::Sample   => MissionPhase::Return,
            MissionPhase::Return   => MissionPhase::Traverse,
        }
    }

    /// Display name published to the UI layer.
    pub fn label(self) -> &'static str {
        match self {
            MissionPhase::Traverse => "TRAVERSE",
            MissionPhase::Scan     => "SCAN",
            MissionPhase::Sample   => "SAMPLE",
            MissionPhase::Return   => "RETURN",
        }
    }

    /// Whether the chassis drives forward during this phase.
    pub fn permits_motion(self) -> bool {
        matches!(self, MissionPhase::Traverse | MissionPhase::Return)
    }
}

/// Seconds spent in each phase before moving on.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseDwell {
    pub traverse: Scalar,
    pub scan: Scalar,
    pub sample: Scalar,
    #[serde(rename = "return")]
    pub return_: Scalar,
}

impl Default for PhaseDwell {
    fn default() -> Self { Self { traverse: 6.0, scan: 3.0, sample: 4.0, return_: 3.0 } }
}

impl PhaseDwell {
    pub fn of(&self, phase: MissionPhase) -> Scalar {
        match phase {
            MissionPhase::Traverse => self.traverse,
            MissionPhase::Scan     => self.scan,
            MissionPhase::Sample   => self.sample,
            MissionPhase::Return   => self.return_,
        }
    }
}

/// Travel configuration: arm folded up over the deck, mast looking ahead.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StowPose {
    pub arm_base: Scalar,
    pub arm_shoulder: Scalar,
    pub arm_forearm: Scalar,
    pub mast_yaw: Scalar,
    pub mast_tilt: Scalar,
}

impl Default for StowPose {
    fn default() -> Self {
        Self { arm_base: 0.0, arm_shoulder: 1.2, arm_forearm: -2.3, mast_yaw: 0.0, mast_tilt: 0.15 }
    }
}

impl StowPose {
    pub fn angle(&self, j: JointName) -> Scalar {
        match j {
            JointName::ArmBase     => self.arm_base,
            JointName::ArmShoulder => self.arm_shoulder,
            JointName::ArmForearm  => self.arm_forearm,
            JointName::MastYaw     => self.mast_yaw,
            JointName::MastTilt    => self.mast_tilt,
        }
    }
}

/// Sinusoidal mast sweep, driven by absolute simulation time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPattern {
    pub yaw_amp: Scalar,
    pub yaw_freq: Scalar,   // rad/s
    pub tilt_amp: Scalar,
    pub tilt_freq: Scalar,  // rad/s
}

impl Default for ScanPattern {
    fn default() -> Self { Self { yaw_amp: 0.9, yaw_freq: 0.8, tilt_amp: 0.25, tilt_freq: 1.3 } }
}

/// Arm deployed toward the ground in front of the rover.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplePose {
    pub arm_base: Scalar,
    pub arm_shoulder: Scalar,
    pub arm_forearm: Scalar,
}

impl Default for SamplePose {
    fn default() -> Self { Self { arm_base: 0.6, arm_shoulder: 0.0, arm_forearm: -0.9 } }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionParams {
    pub dwell: PhaseDwell,
    pub stow: StowPose,
    pub scan: ScanPattern,
    pub sample: SamplePose,
}

/// Timed, unconditional phase cycle.
#[derive(Copy, Clone, Debug)]
pub struct MissionCtrl {
    pub params: MissionParams,
    phase: MissionPhase,
    phase_timer: Scalar,
}

impl MissionCtrl {
    pub fn new(params: MissionParams) -> Self {
        Self { params, phase: MissionPhase::Traverse, phase_timer: 0.0 }
    }

    #[inline] pub fn phase(&self) -> MissionPhase { self.phase }
    /// Seconds since the current phase was entered.
    #[inline] pub fn phase_timer(&self) -> Scalar { self.phase_timer }
    #[inline] pub fn label(&self) -> &'static str { self.phase.label() }

    /// Advance the phase timer; returns the new phase when a dwell expires.
    /// At most one transition per call, and the timer restarts at zero.
    pub fn step(&mut self, dt: Scalar) -> Option<MissionPhase> {
        self.phase_timer += dt.max(0.0);
        if self.phase_timer >= self.params.dwell.of(self.phase) {
            self.phase = self.phase.next();
            self.phase_timer = 0.0;
            Some(self.phase)
        } else {
            None
        }
    }

    /// Write this phase's joint targets. Called every tick, not only on entry.
    pub fn assert_targets(&self, sim_time: Scalar, joints: &mut JointTable) {
        let p = &self.params;
        match self.phase {
            MissionPhase::Traverse => {
                for j in JointName::ALL {
                    joints.set_target(j, p.stow.angle(j));
                }
            }
            MissionPhase::Scan => {
                let s = &p.scan;
                joints.set_target(JointName::MastYaw, p.stow.mast_yaw + s.yaw_amp * (sim_time * s.yaw_freq).sin());
                joints.set_target(JointName::MastTilt, p.stow.mast_tilt + s.tilt_amp * (sim_time * s.tilt_freq).sin());
            }
            MissionPhase::Sample => {
                joints.set_target(JointName::MastYaw, p.stow.mast_yaw);
                joints.set_target(JointName::ArmBase, p.sample.arm_base);
                joints.set_target(JointName::ArmShoulder, p.sample.arm_shoulder);
                joints.set_target(JointName::ArmForearm, p.sample.arm_forearm);
            }
            // Whatever was last asserted keeps easing in.
            MissionPhase::Return => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use roverkin_articulation::AnimatorParams;

    fn table(m: &MissionCtrl) -> JointTable {
        JointTable::new(&AnimatorParams::default(), |j| m.params.stow.angle(j))
    }

    #[test] fn cycle_order_and_dwells() {
        let mut m = MissionCtrl::new(MissionParams::default());
        let mut seen = Vec::new();
        let mut ticks_in_phase = 0;
        for _ in 0..64 {
            ticks_in_phase += 1;
            if let Some(p) = m.step(0.5) {
                seen.push((p, ticks_in_phase));
                ticks_in_phase = 0;
            }
        }
        let phases: Vec<_> = seen.iter().map(|s| s.0).collect();
        assert_eq!(&phases[..5], &[
            MissionPhase::Scan, MissionPhase::Sample, MissionPhase::Return,
            MissionPhase::Traverse, MissionPhase::Scan,
        ]);
        // 0.5 s ticks: 6 s = 12 ticks, 3 s = 6, 4 s = 8, 3 s = 6.
        let ticks: Vec<_> = seen.iter().map(|s| s.1).collect();
        assert_eq!(&ticks[..5], &[12, 6, 8, 6, 12]);
    }

    #[test] fn timer_never_exceeds_dwell() {
        let mut m = MissionCtrl::new(MissionParams::default());
        let dt = 0.37;
        for _ in 0..500 {
            let before = m.phase();
            m.step(dt);
            if m.phase() == before {
                assert!(m.phase_timer() < m.params.dwell.of(before));
            } else {
                assert_eq!(m.phase_timer(), 0.0);
            }
        }
    }

    #[test] fn labels() {
        assert_eq!(MissionPhase::Traverse.label(), "TRAVERSE");
        assert_eq!(MissionPhase::Return.label(), "RETURN");
        assert!(MissionPhase::Return.permits_motion());
        assert!(!MissionPhase::Scan.permits_motion());
    }

    #[test] fn traverse_stows_everything() {
        let m = MissionCtrl::new(MissionParams::default());
        let mut j = JointTable::new(&AnimatorParams::default(), |_| 0.0);
        m.assert_targets(12.0, &mut j);
        for name in JointName::ALL {
            assert_eq!(j.target(name), m.params.stow.angle(name));
        }
    }

    #[test] fn scan_follows_absolute_time() {
        let mut m = MissionCtrl::new(MissionParams::default());
        m.step(6.0);
        assert_eq!(m.phase(), MissionPhase::Scan);
        let mut j = table(&m);
        let t = 7.25;
        m.assert_targets(t, &mut j);
        let s = m.params.scan;
        assert_abs_diff_eq!(j.target(JointName::MastYaw), s.yaw_amp * (t * s.yaw_freq).sin(), epsilon = 1e-6);
        assert_abs_diff_eq!(
            j.target(JointName::MastTilt),
            m.params.stow.mast_tilt + s.tilt_amp * (t * s.tilt_freq).sin(),
            epsilon = 1e-6
        );
        // Arm untouched during the scan.
        assert_eq!(j.target(JointName::ArmShoulder), m.params.stow.arm_shoulder);
    }

    #[test] fn sample_deploys_arm_and_centers_mast() {
        let mut m = MissionCtrl::new(MissionParams::default());
        m.step(6.0);
        m.step(3.0);
        assert_eq!(m.phase(), MissionPhase::Sample);
        let mut j = table(&m);
        j.set_target(JointName::MastYaw, 0.7);
        m.assert_targets(0.0, &mut j);
        assert_eq!(j.target(JointName::MastYaw), m.params.stow.mast_yaw);
        assert_eq!(j.target(JointName::ArmBase), m.params.sample.arm_base);
        assert_eq!(j.target(JointName::ArmShoulder), m.params.sample.arm_shoulder);
        assert_eq!(j.target(JointName::ArmForearm), m.params.sample.arm_forearm);
    }

    #[test] fn return_asserts_nothing() {
        let mut m = MissionCtrl::new(MissionParams::default());
        for d in [6.0, 3.0, 4.0] { m.step(d); }
        assert_eq!(m.phase(), MissionPhase::Return);
        let mut j = table(&m);
        j.set_target(JointName::ArmForearm, -0.42);
        m.assert_targets(99.0, &mut j);
        assert_eq!(j.target(JointName::ArmForearm), -0.42);
    }
}
