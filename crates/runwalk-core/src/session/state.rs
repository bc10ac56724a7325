//! The session record and its per-sample step.
//!
//! Everything a sample needs (distance, split history, phase) lives in one
//! `Session` value and is read from it at call time. Nothing is captured when
//! the subscription is opened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::elapsed_seconds;
use super::phase::{Phase, PhaseController};
use super::split::{MileSplit, SplitTracker};
use crate::events::Event;
use crate::geo::{distance_delta, Position, PositionSample};

/// Tunables for the run/walk cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRules {
    /// Distance walked after each mile before running again.
    pub walk_interval_miles: f64,
    /// Whether the first mile of a session also starts a walk.
    pub walk_after_first_mile: bool,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            walk_interval_miles: 0.1,
            walk_after_first_mile: true,
        }
    }
}

/// Observable state handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub cumulative_distance: f64,
    pub elapsed_seconds: u64,
    pub is_active: bool,
    pub phase: Phase,
}

impl SessionSnapshot {
    pub fn distance_label(&self) -> String {
        format!("Distance: {:.2} miles", self.cumulative_distance)
    }

    pub fn time_label(&self) -> String {
        format!("Time: {} seconds", self.elapsed_seconds)
    }

    /// Label of the single start/stop button.
    pub fn command_label(&self) -> &'static str {
        if self.is_active {
            "Stop"
        } else {
            "Start"
        }
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            cumulative_distance: 0.0,
            elapsed_seconds: 0,
            is_active: false,
            phase: Phase::Run,
        }
    }
}

impl std::fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.distance_label(), self.time_label())
    }
}

/// The live training run.
#[derive(Debug, Clone)]
pub struct Session {
    rules: SessionRules,
    active: bool,
    start_time: Option<DateTime<Utc>>,
    cumulative_miles: f64,
    elapsed_secs: u64,
    last_position: Option<Position>,
    splits: SplitTracker,
    phase: PhaseController,
}

impl Session {
    /// An inactive session with zeroed counters.
    pub fn new(rules: SessionRules) -> Self {
        Self {
            rules,
            active: false,
            start_time: None,
            cumulative_miles: 0.0,
            elapsed_secs: 0,
            last_position: None,
            splits: SplitTracker::new(),
            phase: PhaseController::new(rules.walk_interval_miles),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn cumulative_miles(&self) -> f64 {
        self.cumulative_miles
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn last_position(&self) -> Option<&Position> {
        self.last_position.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn mile_marker(&self) -> f64 {
        self.phase.mile_marker()
    }

    pub fn last_split_secs(&self) -> Option<u64> {
        self.splits.last_split_secs()
    }

    pub fn splits(&self) -> &[MileSplit] {
        self.splits.history()
    }

    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            cumulative_distance: self.cumulative_miles,
            elapsed_seconds: self.elapsed_secs,
            is_active: self.active,
            phase: self.phase.phase(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            snapshot: self.snapshot(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh session at `now`. Nothing from a previous run survives.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Event {
        *self = Self::new(self.rules);
        self.active = true;
        self.start_time = Some(now);
        Event::SessionStarted { at: now }
    }

    /// Stop the session. Returns `None` if it was not running.
    ///
    /// Distance, phase and split history stay visible until the next `begin`.
    pub fn end(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.active {
            return None;
        }
        let elapsed_secs = self
            .start_time
            .map(|start| elapsed_seconds(start, now))
            .unwrap_or(self.elapsed_secs);
        let event = Event::SessionStopped {
            distance_miles: self.cumulative_miles,
            elapsed_secs,
            miles_completed: self.cumulative_miles.floor() as u32,
            at: now,
        };
        self.active = false;
        self.start_time = None;
        self.elapsed_secs = 0;
        self.last_position = None;
        Some(event)
    }

    /// Fold one position sample into the session.
    ///
    /// Samples delivered to an inactive session are dropped.
    pub fn apply_sample(&mut self, sample: &PositionSample) -> Vec<Event> {
        if !self.active {
            tracing::debug!("dropping sample for inactive session");
            return Vec::new();
        }
        let delta = distance_delta(self.last_position.as_ref(), &sample.position);
        self.last_position = Some(sample.position);
        self.advance(delta, sample.at)
    }

    /// Add `delta_miles` observed at `at` and run split and phase evaluation.
    pub fn advance(&mut self, delta_miles: f64, at: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }

        let previous_miles = self.cumulative_miles;
        if delta_miles.is_finite() && delta_miles > 0.0 {
            self.cumulative_miles += delta_miles;
        }
        if let Some(start) = self.start_time {
            self.elapsed_secs = elapsed_seconds(start, at);
        }
        tracing::debug!(
            distance = self.cumulative_miles,
            elapsed = self.elapsed_secs,
            "sample applied"
        );

        if let Some(outcome) =
            self.splits
                .observe(previous_miles, self.cumulative_miles, self.elapsed_secs)
        {
            tracing::info!(
                mile = outcome.split.mile,
                split_secs = ?outcome.split.split_secs,
                elapsed = self.elapsed_secs,
                "mile completed"
            );
            events.push(Event::MileCompleted {
                mile: outcome.split.mile,
                split_secs: outcome.split.split_secs,
                elapsed_secs: outcome.split.elapsed_secs,
            });
            if let Some(announcement) = &outcome.announcement {
                events.push(Event::Announcement {
                    text: announcement.text(),
                });
            }

            let first_mile = outcome.split.split_secs.is_none();
            if !first_mile || self.rules.walk_after_first_mile {
                if let Some((from, to)) = self.phase.enter_walk(outcome.mile_marker()) {
                    tracing::info!(%from, %to, marker = outcome.mile_marker(), "phase changed");
                    events.push(Event::PhaseChanged {
                        from,
                        to,
                        mile_marker: outcome.mile_marker(),
                        distance_miles: self.cumulative_miles,
                    });
                }
            }
        }

        if let Some(announcement) = self.phase.evaluate(self.cumulative_miles) {
            tracing::info!(marker = self.phase.mile_marker(), "walk interval finished");
            events.push(Event::Announcement {
                text: announcement.text(),
            });
            events.push(Event::PhaseChanged {
                from: Phase::Walk,
                to: Phase::Run,
                mile_marker: self.phase.mile_marker(),
                distance_miles: self.cumulative_miles,
            });
        }

        events
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn announcements(events: &[Event]) -> Vec<&str> {
        events.iter().filter_map(Event::announcement_text).collect()
    }

    fn started() -> Session {
        let mut session = Session::default();
        session.begin(t0());
        session
    }

    #[test]
    fn new_session_is_inactive_and_running_phase() {
        let session = Session::default();
        assert!(!session.is_active());
        assert_eq!(session.phase(), Phase::Run);
        assert_eq!(session.start_time(), None);
        assert_eq!(session.snapshot(), SessionSnapshot::default());
    }

    #[test]
    fn first_mile_records_split_and_walks() {
        let mut session = started();
        assert!(session.advance(0.0, at(0)).is_empty());
        assert!(session.advance(0.5, at(300)).is_empty());
        assert_eq!(session.phase(), Phase::Run);

        let events = session.advance(0.52, at(620));
        assert!(announcements(&events).is_empty());
        assert_eq!(session.last_split_secs(), Some(620));
        assert_eq!(session.phase(), Phase::Walk);
        assert_eq!(session.mile_marker(), 1.0);
        assert!(matches!(
            events[0],
            Event::MileCompleted {
                mile: 1,
                split_secs: None,
                elapsed_secs: 620
            }
        ));
    }

    #[test]
    fn walk_ends_once_after_a_tenth() {
        let mut session = started();
        session.advance(0.5, at(300));
        session.advance(0.52, at(620));

        let events = session.advance(0.08, at(950));
        assert_eq!(
            announcements(&events),
            vec!["You have walked for 0.1 miles; Time to run for 1 more mile"]
        );
        assert_eq!(session.phase(), Phase::Run);
        assert_eq!(session.mile_marker(), 1.0);

        let events = session.advance(0.2, at(1000));
        assert!(events.is_empty());
    }

    #[test]
    fn second_mile_announces_split() {
        let mut session = started();
        session.advance(1.01, at(600));
        session.advance(0.2, at(700));
        let events = session.advance(0.8, at(1150));
        assert_eq!(
            announcements(&events),
            vec!["Mile 2 completed in 550 seconds. Total time is 1150 seconds."]
        );
        assert_eq!(session.mile_marker(), 2.0);
        assert_eq!(session.phase(), Phase::Walk);
        assert_eq!(session.splits().len(), 2);
    }

    #[test]
    fn first_mile_can_stay_running() {
        let mut session = Session::new(SessionRules {
            walk_after_first_mile: false,
            ..SessionRules::default()
        });
        session.begin(t0());
        session.advance(1.05, at(610));
        assert_eq!(session.phase(), Phase::Run);
        assert_eq!(session.last_split_secs(), Some(610));

        session.advance(1.0, at(1200));
        assert_eq!(session.phase(), Phase::Walk);
        assert_eq!(session.mile_marker(), 2.0);
    }

    #[test]
    fn big_jump_walks_and_runs_in_one_sample() {
        let mut session = started();
        let events = session.advance(1.15, at(700));
        assert_eq!(session.phase(), Phase::Run);
        assert_eq!(announcements(&events).len(), 1);
        let changes = events
            .iter()
            .filter(|e| matches!(e, Event::PhaseChanged { .. }))
            .count();
        assert_eq!(changes, 2);
    }

    #[test]
    fn repeated_position_adds_nothing() {
        let mut session = started();
        let fix = PositionSample::new(40.0, -74.0, at(10));
        session.apply_sample(&fix);
        session.apply_sample(&PositionSample { at: at(20), ..fix });
        assert_eq!(session.cumulative_miles(), 0.0);
        assert_eq!(session.elapsed_secs(), 20);
    }

    #[test]
    fn negative_or_nan_delta_is_ignored() {
        let mut session = started();
        session.advance(0.3, at(100));
        session.advance(-0.1, at(110));
        session.advance(f64::NAN, at(120));
        assert_eq!(session.cumulative_miles(), 0.3);
    }

    #[test]
    fn inactive_session_drops_samples() {
        let mut session = Session::default();
        let events = session.apply_sample(&PositionSample::new(40.0, -74.0, t0()));
        assert!(events.is_empty());
        assert!(session.last_position().is_none());
    }

    #[test]
    fn end_clears_clock_but_keeps_distance() {
        let mut session = started();
        session.advance(1.05, at(640));
        let stopped = session.end(at(700)).unwrap();
        assert!(matches!(
            stopped,
            Event::SessionStopped {
                elapsed_secs: 700,
                miles_completed: 1,
                ..
            }
        ));
        assert!(!session.is_active());
        assert_eq!(session.start_time(), None);
        assert_eq!(session.elapsed_secs(), 0);
        assert!(session.last_position().is_none());
        assert_eq!(session.cumulative_miles(), 1.05);
        assert_eq!(session.phase(), Phase::Walk);
        assert!(session.end(at(800)).is_none());
    }

    #[test]
    fn begin_resets_everything() {
        let mut session = started();
        session.advance(1.05, at(640));
        session.end(at(700));

        session.begin(at(1000));
        assert!(session.is_active());
        assert_eq!(session.cumulative_miles(), 0.0);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.phase(), Phase::Run);
        assert_eq!(session.mile_marker(), 0.0);
        assert_eq!(session.last_split_secs(), None);
        assert!(session.splits().is_empty());
        assert_eq!(session.start_time(), Some(at(1000)));
    }

    #[test]
    fn snapshot_labels() {
        let mut session = started();
        session.advance(0.456, at(75));
        let snap = session.snapshot();
        assert_eq!(snap.distance_label(), "Distance: 0.46 miles");
        assert_eq!(snap.time_label(), "Time: 75 seconds");
        assert_eq!(snap.command_label(), "Stop");
        assert_eq!(snap.to_string(), "Distance: 0.46 miles\nTime: 75 seconds");
    }
}
