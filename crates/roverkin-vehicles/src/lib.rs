#![deny(missing_docs)]
//! Kinematic rover: terrain-following pose and passive rocker articulation.
//!
//! Usage:
//! - build a [`PoseSolver`] from [`RoverParams`] and step it once per tick.
//! - feed the new pose to [`SuspensionState::solve`] in the same tick.
//!
//! No forces, no contacts: everything is derived from `Terrain::height`.

pub mod params;
pub mod pose;
pub mod suspension;

pub use params::RoverParams;
pub use pose::{PoseSolver, VehiclePose};
pub use suspension::SuspensionState;
