//! RUN/WALK state machine.
//!
//! ```text
//! Run --(mile completed)--> Walk --(walked >= walk interval)--> Run
//! ```
//!
//! There is no terminal state. A new session always begins in `Run`.

use serde::{Deserialize, Serialize};

use crate::announce::Announcement;

/// Absorbs float noise from summing many small haversine deltas.
const DISTANCE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Run,
    Walk,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Run => f.write_str("RUN"),
            Phase::Walk => f.write_str("WALK"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseController {
    phase: Phase,
    /// Whole-mile distance at which the current walk began.
    mile_marker: f64,
    walk_interval_miles: f64,
}

impl PhaseController {
    pub fn new(walk_interval_miles: f64) -> Self {
        Self {
            phase: Phase::Run,
            mile_marker: 0.0,
            walk_interval_miles,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mile_marker(&self) -> f64 {
        self.mile_marker
    }

    /// RUN -> WALK after a completed mile. The marker is re-anchored even if
    /// the runner is already walking.
    pub fn enter_walk(&mut self, mile_marker: f64) -> Option<(Phase, Phase)> {
        self.mile_marker = mile_marker;
        let from = self.phase;
        self.phase = Phase::Walk;
        (from != Phase::Walk).then_some((from, Phase::Walk))
    }

    /// WALK -> RUN once the walk interval has been covered since the marker.
    pub fn evaluate(&mut self, cumulative_miles: f64) -> Option<Announcement> {
        if self.phase != Phase::Walk {
            return None;
        }
        let walked = cumulative_miles - self.mile_marker;
        if walked + DISTANCE_EPSILON < self.walk_interval_miles {
            return None;
        }
        self.phase = Phase::Run;
        Some(Announcement::WalkFinished {
            walk_miles: self.walk_interval_miles,
        })
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Run;
        self.mile_marker = 0.0;
    }
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new(0.1)
    }
}
