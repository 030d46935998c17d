mod mission;
pub use mission::{
    MissionCtrl, MissionParams, MissionPhase, PhaseDwell, SamplePose, ScanPattern, StowPose,
};
