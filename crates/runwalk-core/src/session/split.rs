//! Whole-mile crossing detection and split timing.

use serde::{Deserialize, Serialize};

use crate::announce::Announcement;

/// One completed mile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MileSplit {
    pub mile: u32,
    /// Seconds since the previous mile; `None` for the first mile.
    pub split_secs: Option<u64>,
    /// Session elapsed seconds when the mile was crossed.
    pub elapsed_secs: u64,
}

/// Result of a mile crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub split: MileSplit,
    /// Only present when a previous split exists to time against.
    pub announcement: Option<Announcement>,
}

impl SplitOutcome {
    /// Whole-mile distance at which the crossing happened.
    pub fn mile_marker(&self) -> f64 {
        f64::from(self.split.mile)
    }
}

/// Tracks the last split time and the split history of one session.
#[derive(Debug, Clone, Default)]
pub struct SplitTracker {
    last_split_secs: Option<u64>,
    history: Vec<MileSplit>,
}

impl SplitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_split_secs(&self) -> Option<u64> {
        self.last_split_secs
    }

    pub fn history(&self) -> &[MileSplit] {
        &self.history
    }

    /// Check whether the move from `previous_miles` to `new_miles` crossed an
    /// integer mile.
    ///
    /// Several miles crossed between two samples still count as one crossing,
    /// credited to `floor(new_miles)`.
    pub fn observe(
        &mut self,
        previous_miles: f64,
        new_miles: f64,
        elapsed_secs: u64,
    ) -> Option<SplitOutcome> {
        if new_miles.floor() <= previous_miles.floor() {
            return None;
        }
        let mile = new_miles.floor() as u32;

        let (split_secs, announcement) = match self.last_split_secs {
            None => (None, None),
            Some(last) => {
                let split_secs = elapsed_secs.saturating_sub(last);
                let announcement = Announcement::SplitCompleted {
                    mile,
                    split_secs,
                    total_secs: elapsed_secs,
                };
                (Some(split_secs), Some(announcement))
            }
        };
        self.last_split_secs = Some(elapsed_secs);

        let split = MileSplit {
            mile,
            split_secs,
            elapsed_secs,
        };
        self.history.push(split);
        Some(SplitOutcome {
            split,
            announcement,
        })
    }
}
