//! Session orchestration.
//!
//! The controller owns the single live [`Session`] and the collaborators
//! around it. Samples are processed one at a time through `&mut self`, so no
//! two samples can ever race on the record.
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(permission, source, announcer);
//! let mut state = controller.subscribe_state();
//! controller.start(Utc::now()).await?;
//! while let Some(update) = controller.next_update().await {
//!     controller.handle_update(update);
//! }
//! controller.stop(Utc::now());
//! ```

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};

use super::state::{Session, SessionRules, SessionSnapshot};
use crate::error::{CoreError, SessionError};
use crate::events::Event;
use crate::geo::PositionSample;
use crate::providers::{
    AnnouncementSink, LocationUpdate, PermissionProvider, PositionSource, WatchHandle,
    WatchOptions,
};
use crate::storage::Config;

pub struct SessionController<P, S, A> {
    session: Session,
    permission: P,
    source: S,
    announcer: A,
    options: WatchOptions,
    speech_enabled: bool,
    watch_handle: Option<WatchHandle>,
    updates: Option<mpsc::UnboundedReceiver<LocationUpdate>>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl<P, S, A> SessionController<P, S, A>
where
    P: PermissionProvider,
    S: PositionSource,
    A: AnnouncementSink,
{
    pub fn new(permission: P, source: S, announcer: A) -> Self {
        let session = Session::default();
        let (state_tx, _) = watch::channel(session.snapshot());
        Self {
            session,
            permission,
            source,
            announcer,
            options: WatchOptions::default(),
            speech_enabled: true,
            watch_handle: None,
            updates: None,
            state_tx,
        }
    }

    /// Build a controller using the rules and watch options from `config`.
    pub fn from_config(config: &Config, permission: P, source: S, announcer: A) -> Self {
        Self::new(permission, source, announcer)
            .with_rules(config.session_rules())
            .with_watch_options(config.watch_options())
            .with_speech(config.announcements.enabled)
    }

    pub fn with_rules(mut self, rules: SessionRules) -> Self {
        self.session = Session::new(rules);
        self.publish();
        self
    }

    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    /// When disabled, announcement events are still produced but nothing is spoken.
    pub fn with_speech(mut self, enabled: bool) -> Self {
        self.speech_enabled = enabled;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    /// Receive every published snapshot.
    pub fn subscribe_state(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Ask for permission, open a position watch and begin a fresh session.
    ///
    /// Returns `Ok(None)` if a session is already running.
    pub async fn start(&mut self, now: DateTime<Utc>) -> Result<Option<Event>, CoreError> {
        if self.session.is_active() {
            return Ok(None);
        }
        if !self.permission.request_location_permission().await {
            tracing::warn!("location permission denied; session not started");
            return Err(SessionError::PermissionDenied.into());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.source.subscribe(&self.options, tx)?;
        self.watch_handle = Some(handle);
        self.updates = Some(rx);

        let event = self.session.begin(now);
        tracing::info!(%now, "session started");
        self.publish();
        Ok(Some(event))
    }

    /// Cancel the position watch and stop the session.
    ///
    /// Returns `None` if nothing was running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.session.is_active() {
            return None;
        }
        if let Some(handle) = self.watch_handle.take() {
            self.source.unsubscribe(handle);
        }
        // Anything still queued belongs to the old watch.
        self.updates = None;

        let event = self.session.end(now);
        tracing::info!(distance = self.session.cumulative_miles(), "session stopped");
        self.publish();
        event
    }

    /// The start/stop button.
    pub async fn toggle(&mut self, now: DateTime<Utc>) -> Result<Option<Event>, CoreError> {
        if self.session.is_active() {
            Ok(self.stop(now))
        } else {
            self.start(now).await
        }
    }

    /// Wait for the next update from the current watch.
    ///
    /// `None` once the session is stopped or the source has closed the feed.
    pub async fn next_update(&mut self) -> Option<LocationUpdate> {
        self.updates.as_mut()?.recv().await
    }

    pub fn handle_update(&mut self, update: LocationUpdate) -> Vec<Event> {
        match update {
            LocationUpdate::Fix(sample) => self.on_position(&sample),
            LocationUpdate::Error { code, message } => {
                tracing::warn!(code, %message, "position source error");
                vec![Event::PositionError { code, message }]
            }
        }
    }

    /// Process one sample. Ignored unless a session is active.
    pub fn on_position(&mut self, sample: &PositionSample) -> Vec<Event> {
        if !self.session.is_active() {
            tracing::debug!("ignoring stale sample");
            return Vec::new();
        }
        let events = self.session.apply_sample(sample);
        if self.speech_enabled {
            for text in events.iter().filter_map(Event::announcement_text) {
                self.announcer.speak(text);
            }
        }
        self.publish();
        events
    }

    /// Drain the current watch until it closes, collecting every event.
    pub async fn run_to_end(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(update) = self.next_update().await {
            events.extend(self.handle_update(update));
        }
        events
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.session.snapshot());
    }
}
