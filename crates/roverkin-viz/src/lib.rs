//! Read-only diagnostics around the simulator: stage schedule, debug dump
//! cadence, and the phase telemetry ledger consumed by the UI layer.

use std::collections::VecDeque;

use roverkin_core::{schedule_digest, Scalar, StepStage};
use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn stages(&self) -> &[StepStage] { &self.stages }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Emit a debug-level state dump every N ticks (0 = never).
    pub log_every: u32,
    pub show_pose: bool,
    pub show_suspension: bool,
    pub show_joints: bool,
    /// Capacity of the telemetry ledger.
    pub ledger_len: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { log_every: 0, show_pose: true, show_suspension: true, show_joints: false, ledger_len: 64 }
    }
}

impl DebugSettings {
    #[inline]
    pub fn due(&self, tick: u64) -> bool {
        self.log_every > 0 && tick % self.log_every as u64 == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LedgerEvent {
    PhaseEntered { tick: u64, sim_time: Scalar, label: &'static str },
}

/// Bounded telemetry log; the oldest event is dropped when full.
#[derive(Clone, Debug)]
pub struct Ledger {
    cap: usize,
    events: VecDeque<LedgerEvent>,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { cap, events: VecDeque::with_capacity(cap) }
    }

    pub fn push(&mut self, e: LedgerEvent) {
        if self.events.len() == self.cap { self.events.pop_front(); }
        self.events.push_back(e);
    }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn ledger_drops_oldest() {
        let mut l = Ledger::new(2);
        for tick in 0..3 {
            l.push(LedgerEvent::PhaseEntered { tick, sim_time: tick as f32, label: "SCAN" });
        }
        assert_eq!(l.len(), 2);
        let ticks: Vec<u64> = l.iter().map(|LedgerEvent::PhaseEntered { tick, .. }| *tick).collect();
        assert_eq!(ticks, vec![1, 2]);
    }

    #[test] fn debug_cadence() {
        let d = DebugSettings { log_every: 5, ..DebugSettings::default() };
        assert!(d.due(0) && d.due(10));
        assert!(!d.due(3));
        assert!(!DebugSettings::default().due(0));
    }

    #[test] fn recorder_digest_tracks_contents() {
        let mut r = ScheduleRecorder::new();
        for s in StepStage::ORDER { r.push(s); }
        assert_eq!(r.digest(), schedule_digest(&StepStage::ORDER));
        r.clear();
        assert!(r.stages().is_empty());
    }
}
