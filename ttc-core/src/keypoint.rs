use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of the point on the image the feature came from.
pub trait ImagePoint {
    /// Retrieves the point on the image
    fn image_point(&self) -> Point2<f64>;
}

/// A point on the rectified image frame in pixel coordinates.
///
/// Whatever descriptor was used to detect and match the keypoint is not carried here,
/// since none of the fusion algorithms interpret it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KeyPoint(pub Point2<f64>);

impl KeyPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point2::new(x, y))
    }
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        self.0
    }
}

impl ImagePoint for Point2<f64> {
    fn image_point(&self) -> Point2<f64> {
        *self
    }
}

/// A match between a keypoint of the previous frame and a keypoint of the current frame.
///
/// The indices refer to the `keypoints` of the respective [`DataFrame`](crate::DataFrame).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KeyPointMatch {
    /// Index of the keypoint in the previous frame.
    pub previous: usize,
    /// Index of the keypoint in the current frame.
    pub current: usize,
    /// Match quality as reported by the matcher (descriptor distance).
    ///
    /// Carried along for downstream consumers; time-to-collision does not weight by it.
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub score: f64,
}

impl KeyPointMatch {
    pub fn new(previous: usize, current: usize) -> Self {
        Self {
            previous,
            current,
            score: 0.0,
        }
    }

    #[must_use]
    pub fn score(self, score: f64) -> Self {
        Self { score, ..self }
    }
}
