//! Time-to-collision estimation from a camera and a range sensor.
//!
//! Each frame consists of bounding boxes from an object detector, keypoints matched against the
//! preceding frame and a point cloud from the range sensor. For a pair of consecutive frames:
//!
//! 1. The range points of each frame are projected into the image and assigned to the box that
//!    encloses them ([`cluster_range_points`]). Points near the edges of a box are excluded by
//!    shrinking the box, and points within several boxes are dropped.
//! 2. Boxes of the previous frame are linked to boxes of the current frame by counting the
//!    keypoint matches that connect them ([`match_bounding_boxes`]).
//! 3. For every link, the keypoint matches within the current box are collected
//!    ([`cluster_keypoint_matches`]).
//! 4. Two independent estimates of the time-to-collision are computed: one from the closing
//!    distance of the range points in the ego lane ([`LidarTtcEstimator`]) and one from the
//!    change in scale of the keypoints ([`CameraTtcEstimator`]).
//!
//! [`TtcPipeline`] runs these steps for a frame pair and [`TtcTracker`] feeds it one frame at a
//! time. Neither estimate failing stops the processing of other objects or frames; failures are
//! reported per object as an [`EstimationError`], and an object that is not getting closer is
//! reported as [`TimeToCollision::NotApproaching`].
//!
//! ```text
//!     previous frame                 current frame
//!   +-----------+                  +-------------+
//!   |  * .   *  |  keypoint match  |   *  .   *  |
//!   |    . *  --+------------------+->   .  *    |     . range point
//!   | *   .  *  |                  | *   .    *  |     * keypoint
//!   +-----------+                  +-------------+
//! ```

mod assignment;
mod association;
mod camera;
mod cluster;
mod error;
mod estimate;
mod lidar;
mod pipeline;
mod settings;

pub use assignment::*;
pub use association::*;
pub use camera::*;
pub use cluster::*;
pub use error::*;
pub use estimate::*;
pub use lidar::*;
pub use pipeline::*;
pub use settings::*;

pub use ttc_core;
pub use ttc_projection::LidarCameraProjection;
