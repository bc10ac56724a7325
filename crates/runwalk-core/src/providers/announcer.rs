use std::sync::{Arc, Mutex};

use super::traits::AnnouncementSink;

/// Writes announcements to the log instead of a speaker.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnnouncer;

impl AnnouncementSink for TracingAnnouncer {
    fn speak(&self, text: &str) {
        tracing::info!(target: "runwalk::speech", "{text}");
    }
}

/// Keeps every spoken line. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnnouncer {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        match self.spoken.lock() {
            Ok(spoken) => spoken.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AnnouncementSink for RecordingAnnouncer {
    fn speak(&self, text: &str) {
        match self.spoken.lock() {
            Ok(mut spoken) => spoken.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}
