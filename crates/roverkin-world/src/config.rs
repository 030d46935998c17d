use roverkin_articulation::AnimatorParams;
use roverkin_controllers::MissionParams;
use roverkin_core::TickPolicy;
use roverkin_terrain::TerrainParams;
use roverkin_vehicles::RoverParams;
use roverkin_viz::DebugSettings;
use serde::{Deserialize, Serialize};

/// Every tunable constant of a simulation run. Read once at start-up;
/// any subset may be supplied, the rest falls back to defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub terrain: TerrainParams,
    pub rover: RoverParams,
    pub mission: MissionParams,
    pub animators: AnimatorParams,
    pub tick: TickPolicy,
    pub debug: DebugSettings,
}
