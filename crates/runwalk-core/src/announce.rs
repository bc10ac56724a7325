//! Spoken coaching cues.

use serde::{Deserialize, Serialize};

/// Something the coach wants said out loud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Announcement {
    /// A whole mile finished after the first one.
    SplitCompleted {
        mile: u32,
        split_secs: u64,
        total_secs: u64,
    },
    /// The walk interval is over.
    WalkFinished { walk_miles: f64 },
}

impl Announcement {
    pub fn text(&self) -> String {
        match self {
            Announcement::SplitCompleted {
                mile,
                split_secs,
                total_secs,
            } => format!(
                "Mile {mile} completed in {split_secs} seconds. Total time is {total_secs} seconds."
            ),
            Announcement::WalkFinished { walk_miles } => format!(
                "You have walked for {walk_miles} miles; Time to run for 1 more mile"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_text() {
        let a = Announcement::SplitCompleted {
            mile: 2,
            split_secs: 540,
            total_secs: 1160,
        };
        assert_eq!(
            a.text(),
            "Mile 2 completed in 540 seconds. Total time is 1160 seconds."
        );
    }

    #[test]
    fn walk_text_uses_short_decimal() {
        let a = Announcement::WalkFinished { walk_miles: 0.1 };
        assert_eq!(
            a.text(),
            "You have walked for 0.1 miles; Time to run for 1 more mile"
        );
    }
}
