use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{Phase, SessionSnapshot};

/// Every state change in a session produces an Event.
/// The presentation layer renders them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        at: DateTime<Utc>,
    },
    SessionStopped {
        distance_miles: f64,
        elapsed_secs: u64,
        miles_completed: u32,
        at: DateTime<Utc>,
    },
    /// A whole-mile boundary was crossed. `split_secs` is absent for the
    /// first mile of a session.
    MileCompleted {
        mile: u32,
        split_secs: Option<u64>,
        elapsed_secs: u64,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        mile_marker: f64,
        distance_miles: f64,
    },
    /// Text handed to the speech sink.
    Announcement {
        text: String,
    },
    /// Non-fatal error reported by the location source.
    PositionError {
        code: i32,
        message: String,
    },
    StateSnapshot {
        #[serde(flatten)]
        snapshot: SessionSnapshot,
    },
}

impl Event {
    /// The announcement text, if this event is one.
    pub fn announcement_text(&self) -> Option<&str> {
        match self {
            Event::Announcement { text } => Some(text),
            _ => None,
        }
    }
}
