use thiserror::Error;

/// Which of the two frames of a pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSide {
    Previous,
    Current,
}

impl core::fmt::Display for FrameSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameSide::Previous => write!(f, "previous"),
            FrameSide::Current => write!(f, "current"),
        }
    }
}

/// Reasons a single time-to-collision estimate could not be produced.
///
/// These are local to one object in one frame pair. Processing of other objects
/// and of later frames carries on.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EstimationError {
    /// No range points of the object lie within the ego lane.
    #[error("no range points of the {0} frame lie within the ego lane")]
    EmptyLane(FrameSide),
    /// Too few keypoint matches lie within the object to form pairs.
    #[error("found {found} keypoint matches in the box, at least {required} are needed")]
    InsufficientMatches { found: usize, required: usize },
    /// Every keypoint pair was too close together or gave a non-finite ratio.
    #[error("none of the {pairs} keypoint pairs produced a usable distance ratio")]
    NoValidRatios { pairs: usize },
    /// The median distance ratio is too close to one to divide by `1 - ratio`.
    #[error("median distance ratio {0} shows no discernible scale change")]
    NoScaleChange(f64),
    /// The closing velocity could not be computed.
    #[error("closing velocity {0} is not finite")]
    NonFiniteVelocity(f64),
    /// The frame rate must be finite and positive.
    #[error("frame rate {0} is not finite and positive")]
    InvalidFrameRate(f64),
    /// The closest in-lane point of the current frame is at or behind the sensor.
    #[error("closest in-lane distance {0} is not in front of the sensor")]
    NonPositiveDistance(f64),
}

/// Rejects a frame rate that would make a time-to-collision infinite or negative.
pub(crate) fn check_frame_rate(frame_rate: f64) -> Result<(), EstimationError> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(())
    } else {
        Err(EstimationError::InvalidFrameRate(frame_rate))
    }
}
