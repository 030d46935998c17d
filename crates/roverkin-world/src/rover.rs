use glam::{UVec2, Vec2};
use roverkin_articulation::JointTable;
use roverkin_controllers::MissionCtrl;
use roverkin_core::{Scalar, StepStage};
use roverkin_terrain::{HeightField, ProceduralTerrain, Terrain};
use roverkin_vehicles::{PoseSolver, SuspensionState};
use roverkin_viz::{Ledger, LedgerEvent, ScheduleRecorder};
use tracing::{debug, info};

use crate::{SimConfig, Snapshot};

/* ---------------- Builder ---------------- */
pub struct RoverBuilder {
    pub config: SimConfig,
    pub start_x: Option<Scalar>,
}

impl RoverBuilder {
    pub fn new() -> Self { Self { config: SimConfig::default(), start_x: None } }

    pub fn with_config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn somewhere other than `travel_min`.
    pub fn start_at(mut self, x: Scalar) -> Self {
        self.start_x = Some(x);
        self
    }

    pub fn build<T: Terrain>(self, terrain: T) -> Rover<T> {
        Rover::new(terrain, self.config, self.start_x)
    }

    /// Rover on the procedural ground described by `config.terrain`.
    pub fn build_procedural(self) -> Rover<ProceduralTerrain> {
        let terrain = ProceduralTerrain::new(self.config.terrain);
        self.build(terrain)
    }
}

impl Default for RoverBuilder {
    fn default() -> Self { Self::new() }
}

/* ---------------- Rover ---------------- */
/// Owns all per-tick state: pose, rockers, mission phase and joint table.
pub struct Rover<T: Terrain> {
    terrain: T,
    config: SimConfig,

    solver: PoseSolver,
    suspension: SuspensionState,
    mission: MissionCtrl,
    joints: JointTable,

    tick: u64,
    sim_time: f64,
    last: Snapshot,

    schedule: ScheduleRecorder,
    ledger: Ledger,
}

impl<T: Terrain> Rover<T> {
    fn new(terrain: T, config: SimConfig, start_x: Option<Scalar>) -> Self {
        let mut solver = PoseSolver::new(config.rover, &terrain);
        if let Some(x) = start_x {
            solver.place(&terrain, x);
        }
        let mission = MissionCtrl::new(config.mission);
        let joints = JointTable::new(&config.animators, |j| config.mission.stow.angle(j));
        let suspension = SuspensionState::solve(&terrain, &config.rover, &solver.pose());

        let mut ledger = Ledger::new(config.debug.ledger_len);
        ledger.push(LedgerEvent::PhaseEntered { tick: 0, sim_time: 0.0, label: mission.label() });

        let last = Snapshot {
            tick: 0,
            sim_time: 0.0,
            dt: 0.0,
            pose: solver.pose(),
            suspension,
            joints: joints.angles(),
            phase: mission.phase(),
            phase_timer: mission.phase_timer(),
            phase_label: mission.label(),
        };

        Self {
            terrain, config, solver, suspension, mission, joints,
            tick: 0, sim_time: 0.0, last,
            schedule: ScheduleRecorder::new(),
            ledger,
        }
    }

    /// Run one tick and return the resulting state.
    ///
    /// Order is fixed: pose, then rockers (they read the new pose), then the
    /// mission phase and its targets, then joint easing (it reads the new
    /// targets). `dt` passes through the tick policy first, so NaN, negative
    /// or stalled inputs never reach the solver.
    pub fn advance(&mut self, dt: Scalar) -> Snapshot {
        let dt = self.config.tick.clamp(dt);
        self.schedule.clear();

        let moving = self.mission.phase().permits_motion();
        let pose = self.solver.step(&self.terrain, dt, moving);
        self.schedule.push(StepStage::Pose);

        self.suspension = SuspensionState::solve(&self.terrain, &self.config.rover, &pose);
        self.schedule.push(StepStage::Suspension);

        self.tick += 1;
        self.sim_time += dt as f64;
        if let Some(phase) = self.mission.step(dt) {
            info!(tick = self.tick, sim_time = self.sim_time, phase = phase.label(), "phase entered");
            self.ledger.push(LedgerEvent::PhaseEntered {
                tick: self.tick,
                sim_time: self.sim_time as Scalar,
                label: phase.label(),
            });
        }
        self.mission.assert_targets(self.sim_time as Scalar, &mut self.joints);
        self.schedule.push(StepStage::Mission);

        self.joints.ease_all(dt);
        self.schedule.push(StepStage::Animate);

        self.last = Snapshot {
            tick: self.tick,
            sim_time: self.sim_time,
            dt,
            pose,
            suspension: self.suspension,
            joints: self.joints.angles(),
            phase: self.mission.phase(),
            phase_timer: self.mission.phase_timer(),
            phase_label: self.mission.label(),
        };
        self.schedule.push(StepStage::Publish);

        self.debug_dump();
        self.last
    }

    fn debug_dump(&self) {
        let d = &self.config.debug;
        if !d.due(self.tick) { return; }
        let s = &self.last;
        if d.show_pose {
            debug!(tick = s.tick, x = s.pose.position.x, y = s.pose.position.y,
                   pitch = s.pose.pitch, roll = s.pose.roll, phase = s.phase_label, "pose");
        }
        if d.show_suspension {
            debug!(tick = s.tick, left = s.suspension.left, right = s.suspension.right, "rockers");
        }
        if d.show_joints {
            for (j, t) in self.joints.iter() {
                debug!(tick = s.tick, joint = j.label(), current = t.current, target = t.target, "joint");
            }
        }
    }

    /// Most recent snapshot (the initial state before the first tick).
    #[inline] pub fn snapshot(&self) -> &Snapshot { &self.last }
    #[inline] pub fn phase_label(&self) -> &'static str { self.mission.label() }
    #[inline] pub fn terrain(&self) -> &T { &self.terrain }
    #[inline] pub fn config(&self) -> &SimConfig { &self.config }
    #[inline] pub fn tick(&self) -> u64 { self.tick }
    #[inline] pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Bake the ground strip the rover can reach: the whole travel range and
    /// both wheel tracks, padded by `margin`. The z spacing is shrunk to at
    /// most `cell.y` so that the lane and both track lines land on grid rows.
    pub fn bake_ground(&self, cell: Vec2, margin: Scalar) -> HeightField {
        let p = &self.config.rover;
        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        let cell = cell.max(Vec2::splat(1e-3));

        let reach_x = p.half_wheelbase.abs().max(p.pitch_probe.abs()) + margin;
        let span_x = (p.travel_max - p.travel_min).max(0.0) + 2.0 * reach_x;
        let nx = (span_x / cell.x).ceil() as u32 + 1;

        let track = p.track_offset.abs();
        let per_track = (track / cell.y).ceil().max(1.0);
        let cell_z = if track > 0.0 { track / per_track } else { cell.y };
        // roll probes may reach past the wheel tracks
        let overhang = (p.roll_probe.abs() - track).max(0.0);
        let pad = ((overhang + margin) / cell_z).ceil();
        let nz = (2.0 * (per_track + pad)) as u32 + 1;

        let origin = Vec2::new(p.travel_min - reach_x, p.lane_z - track - pad * cell_z);
        HeightField::bake(&self.terrain, UVec2::new(nx, nz), Vec2::new(cell.x, cell_z), origin)
    }

    /// Stage order recorded during the last tick.
    pub fn schedule(&self) -> &ScheduleRecorder { &self.schedule }

    /// BLAKE3 digest of the last snapshot.
    pub fn step_hash(&self) -> [u8; 32] { self.last.digest() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roverkin_core::schedule_digest;
    use roverkin_terrain::FlatTerrain;

    #[test] fn initial_snapshot_is_settled() {
        let r = RoverBuilder::new().build(FlatTerrain { y: 1.0 });
        let s = r.snapshot();
        assert_eq!(s.tick, 0);
        assert_eq!(s.phase_label, "TRAVERSE");
        assert_eq!(s.pose.position.y, 1.0 + r.config().rover.ground_clearance());
        assert_eq!(r.ledger().len(), 1);
    }

    #[test] fn stages_run_in_order() {
        let mut r = RoverBuilder::new().build_procedural();
        r.advance(0.016);
        assert_eq!(r.schedule().stages(), &StepStage::ORDER);
        assert_eq!(r.schedule().digest(), schedule_digest(&StepStage::ORDER));
    }

    #[test] fn zero_and_stalled_dt_stay_finite() {
        let mut r = RoverBuilder::new().build_procedural();
        for dt in [0.0, f32::NAN, -3.0, 1.0e9, f32::INFINITY, 0.016] {
            let s = r.advance(dt);
            assert!(s.pose.position.is_finite());
            assert!(s.pose.pitch.is_finite() && s.pose.roll.is_finite());
            assert!(s.suspension.left.is_finite() && s.suspension.right.is_finite());
            assert!(s.joints.current.iter().all(|a| a.is_finite()));
            assert!(s.dt <= r.config().tick.max_dt);
        }
    }

    #[test] fn start_at_overrides_spawn() {
        let r = RoverBuilder::new().start_at(12.5).build(FlatTerrain::default());
        assert_eq!(r.snapshot().pose.position.x, 12.5);
    }
}
