//! Rover rig simulator.
//!
//! [`Rover::advance`] is the whole per-tick contract: it consumes an elapsed
//! time and hands back an immutable [`Snapshot`]. Rendering lives behind
//! [`RenderSink`]; the core never touches scene-graph state.

mod config;
mod rover;
mod session;
mod snapshot;

pub use config::SimConfig;
pub use rover::{Rover, RoverBuilder};
pub use session::{RenderSink, Session, SessionError};
pub use snapshot::Snapshot;

pub use roverkin_articulation::{AppendageAngles, JointName};
pub use roverkin_controllers::MissionPhase;
pub use roverkin_terrain::{FlatTerrain, ProceduralTerrain, Terrain};
pub use roverkin_vehicles::{SuspensionState, VehiclePose};
