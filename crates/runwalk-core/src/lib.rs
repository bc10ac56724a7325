//! # RunWalk Core Library
//!
//! This library provides the core logic for the RunWalk interval coach.
//! It turns a stream of GPS fixes into a training session: cumulative
//! distance, per-mile split times, and RUN/WALK phase switching announced
//! through spoken cues. The CLI replays recorded tracks over the same core.
//!
//! ## Architecture
//!
//! - **Geo**: haversine distance between consecutive fixes
//! - **Session**: a single session record folded forward one sample at a
//!   time, plus the controller that wires it to permission, location and
//!   speech collaborators
//! - **Providers**: traits for those collaborators and stock implementations
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Session`]: Session record and per-sample step
//! - [`SessionController`]: Start/stop commands and sample dispatch
//! - [`Config`]: Application configuration management

pub mod announce;
pub mod error;
pub mod events;
pub mod geo;
pub mod providers;
pub mod session;
pub mod storage;

pub use announce::Announcement;
pub use error::{ConfigError, CoreError, SessionError, ValidationError};
pub use events::Event;
pub use geo::{distance_delta, Position, PositionSample};
pub use providers::{
    AnnouncementSink, LocationUpdate, PermissionProvider, PositionSource, WatchOptions,
};
pub use session::{Phase, Session, SessionController, SessionRules, SessionSnapshot};
pub use storage::Config;
