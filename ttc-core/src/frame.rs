use crate::{KeyPoint, KeyPointMatch, RangePoint, Roi};
use alloc::vec::Vec;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A detected object in a single frame.
///
/// The detector provides the `id`, the `roi` and optionally its class and confidence.
/// The remaining collections start empty and are filled by clustering: range points by
/// projecting the frame's point cloud into the (shrunk) region, keypoints and matches by
/// testing the current keypoint of each match against the region.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    /// Unique within its frame.
    pub id: usize,
    pub roi: Roi,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub class_id: Option<u32>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub confidence: Option<f64>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub range_points: Vec<RangePoint>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub keypoints: Vec<KeyPoint>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub keypoint_matches: Vec<KeyPointMatch>,
}

impl BoundingBox {
    pub fn new(id: usize, roi: Roi) -> Self {
        Self {
            id,
            roi,
            ..Default::default()
        }
    }
}

/// Everything captured at a single time step.
///
/// `matches` connect the keypoints of the preceding frame to the keypoints of this frame
/// and are empty for the first frame of a sequence.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DataFrame {
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub bounding_boxes: Vec<BoundingBox>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub keypoints: Vec<KeyPoint>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub matches: Vec<KeyPointMatch>,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub range_points: Vec<RangePoint>,
}

impl DataFrame {
    pub fn bounding_box(&self, id: usize) -> Option<&BoundingBox> {
        self.bounding_boxes.iter().find(|bb| bb.id == id)
    }

    pub fn bounding_box_mut(&mut self, id: usize) -> Option<&mut BoundingBox> {
        self.bounding_boxes.iter_mut().find(|bb| bb.id == id)
    }

    /// Looks up the keypoints of `m` in `previous` and in this frame.
    ///
    /// Returns `None` if either index is out of range.
    pub fn matched_pair(
        &self,
        previous: &DataFrame,
        m: &KeyPointMatch,
    ) -> Option<(KeyPoint, KeyPoint)> {
        Some((
            *previous.keypoints.get(m.previous)?,
            *self.keypoints.get(m.current)?,
        ))
    }
}

/// The correspondence of an object between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoxLink {
    /// Id of the box in the previous frame.
    pub previous: usize,
    /// Id of the box in the current frame.
    pub current: usize,
    /// Number of keypoint matches that voted for this link.
    pub votes: usize,
}
