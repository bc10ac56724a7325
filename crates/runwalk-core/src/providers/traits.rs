use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::SessionError;
use crate::geo::PositionSample;

/// Asks the platform for location access.
pub trait PermissionProvider {
    /// Resolves to `true` when access was granted.
    fn request_location_permission(&self) -> impl Future<Output = bool> + Send;
}

/// Options forwarded to the position source when a watch is opened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    /// Cached fixes older than this are not delivered.
    pub max_sample_age_ms: u64,
    /// Minimum movement before a new fix is delivered.
    pub min_distance_filter_m: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 15_000,
            max_sample_age_ms: 10_000,
            min_distance_filter_m: 50.0,
        }
    }
}

/// What a position source delivers.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    Fix(PositionSample),
    /// Timeout, signal loss and the like. Never fatal.
    Error { code: i32, message: String },
}

/// Identifies an open watch so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub u64);

/// Continuous position sampling.
///
/// Updates are pushed into `updates` until `unsubscribe` is called or the
/// source runs dry and drops the sender.
pub trait PositionSource {
    fn subscribe(
        &mut self,
        options: &WatchOptions,
        updates: UnboundedSender<LocationUpdate>,
    ) -> Result<WatchHandle, SessionError>;

    fn unsubscribe(&mut self, handle: WatchHandle);
}

/// Fire-and-forget text-to-speech.
pub trait AnnouncementSink {
    fn speak(&self, text: &str);
}
