mod clock;
mod controller;
mod phase;
mod split;
mod state;

pub use clock::elapsed_seconds;
pub use controller::SessionController;
pub use phase::{Phase, PhaseController};
pub use split::{MileSplit, SplitOutcome, SplitTracker};
pub use state::{Session, SessionRules, SessionSnapshot};
