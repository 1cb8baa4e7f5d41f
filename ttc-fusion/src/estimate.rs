#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The outcome of a successful time-to-collision estimate.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeToCollision {
    /// The object is approaching and will be reached in this many seconds.
    Seconds(f64),
    /// The object holds its distance or moves away, so no collision is imminent.
    NotApproaching,
}

impl TimeToCollision {
    /// The time in seconds if a collision is imminent.
    pub fn seconds(self) -> Option<f64> {
        match self {
            TimeToCollision::Seconds(seconds) => Some(seconds),
            TimeToCollision::NotApproaching => None,
        }
    }

    pub fn is_approaching(self) -> bool {
        matches!(self, TimeToCollision::Seconds(_))
    }
}
