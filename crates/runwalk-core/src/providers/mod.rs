//! Seams to the outside world: location permission, the position feed and
//! the speech channel.

mod announcer;
mod permission;
mod replay;
mod traits;

pub use announcer::{RecordingAnnouncer, TracingAnnouncer};
pub use permission::StaticPermission;
pub use replay::ReplaySource;
pub use traits::{
    AnnouncementSink, LocationUpdate, PermissionProvider, PositionSource, WatchHandle,
    WatchOptions,
};
