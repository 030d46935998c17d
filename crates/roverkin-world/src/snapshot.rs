use roverkin_articulation::{AppendageAngles, JointName};
use roverkin_controllers::MissionPhase;
use roverkin_core::{hash_scalar, hash_vec3, Scalar, StepHasher};
use roverkin_vehicles::{SuspensionState, VehiclePose};
use serde::Serialize;

/// Everything a renderer needs for one frame. Plain data, detached from the simulator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub sim_time: f64,
    /// Clamped dt actually integrated this tick.
    pub dt: Scalar,
    pub pose: VehiclePose,
    pub suspension: SuspensionState,
    pub joints: AppendageAngles,
    pub phase: MissionPhase,
    pub phase_timer: Scalar,
    pub phase_label: &'static str,
}

impl Snapshot {
    pub fn hash_into(&self, h: &mut StepHasher) {
        h.update_bytes(&self.tick.to_le_bytes());
        hash_vec3(h, &self.pose.position);
        hash_scalar(h, self.pose.pitch);
        hash_scalar(h, self.pose.roll);
        hash_scalar(h, self.suspension.left);
        hash_scalar(h, self.suspension.right);
        for j in JointName::ALL {
            hash_scalar(h, self.joints.get(j));
            hash_scalar(h, self.joints.target(j));
        }
        h.update_bytes(self.phase_label.as_bytes());
        hash_scalar(h, self.phase_timer);
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        self.hash_into(&mut h);
        h.finalize()
    }
}
