//! A position source that plays back a recorded track.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

use super::traits::{LocationUpdate, PositionSource, WatchHandle, WatchOptions};
use crate::error::{CoreError, SessionError, ValidationError};
use crate::geo::PositionSample;

/// Delivers a fixed list of updates on subscribe, then closes the feed.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    updates: Vec<LocationUpdate>,
    next_handle: u64,
    active: Option<WatchHandle>,
}

impl ReplaySource {
    pub fn new(updates: Vec<LocationUpdate>) -> Self {
        Self {
            updates,
            next_handle: 1,
            active: None,
        }
    }

    pub fn from_samples(samples: impl IntoIterator<Item = PositionSample>) -> Self {
        Self::new(samples.into_iter().map(LocationUpdate::Fix).collect())
    }

    /// Parse a JSON array of `{latitude, longitude, at}` samples.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let samples: Vec<PositionSample> = serde_json::from_str(json)?;
        if samples.is_empty() {
            return Err(ValidationError::EmptyCollection("track samples".into()).into());
        }
        for sample in &samples {
            sample.position.validate()?;
        }
        Ok(Self::from_samples(samples))
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Timestamp of the first fix in the track.
    pub fn first_fix_at(&self) -> Option<DateTime<Utc>> {
        self.fix_times().next()
    }

    /// Timestamp of the last fix in the track.
    pub fn last_fix_at(&self) -> Option<DateTime<Utc>> {
        self.fix_times().last()
    }

    fn fix_times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.updates.iter().filter_map(|update| match update {
            LocationUpdate::Fix(sample) => Some(sample.at),
            LocationUpdate::Error { .. } => None,
        })
    }

    pub fn active_handle(&self) -> Option<WatchHandle> {
        self.active
    }
}

impl PositionSource for ReplaySource {
    fn subscribe(
        &mut self,
        options: &WatchOptions,
        updates: UnboundedSender<LocationUpdate>,
    ) -> Result<WatchHandle, SessionError> {
        tracing::debug!(?options, samples = self.updates.len(), "replaying track");
        for update in &self.updates {
            if updates.send(update.clone()).is_err() {
                return Err(SessionError::SubscribeFailed(
                    "update receiver closed".into(),
                ));
            }
        }
        let handle = WatchHandle(self.next_handle);
        self.next_handle += 1;
        self.active = Some(handle);
        // `updates` drops here, which closes the feed once drained.
        Ok(handle)
    }

    fn unsubscribe(&mut self, handle: WatchHandle) {
        if self.active == Some(handle) {
            self.active = None;
        }
    }
}
