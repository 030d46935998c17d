use serde::Serialize;
use crate::StepHasher;

/// Stages of one simulator tick, in the order they must run.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum StepStage {
    Pose = 1,
    Suspension = 2,
    Mission = 3,
    Animate = 4,
    Publish = 5,
}

impl StepStage {
    pub const ORDER: [StepStage; 5] = [
        StepStage::Pose,
        StepStage::Suspension,
        StepStage::Mission,
        StepStage::Animate,
        StepStage::Publish,
    ];
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}
