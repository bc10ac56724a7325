mod distance;
mod position;

pub use distance::{distance_delta, great_circle_miles, EARTH_RADIUS_MILES};
pub use position::{Position, PositionSample};
