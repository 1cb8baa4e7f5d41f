//! # TTC Core
//!
//! Common types shared by every crate that takes part in camera/lidar time-to-collision
//! estimation. A frame of data consists of object detections ([`BoundingBox`]), image
//! keypoints ([`KeyPoint`]), the matches of those keypoints against the preceding frame
//! ([`KeyPointMatch`]) and the range sensor returns captured at the same instant ([`RangePoint`]).
//!
//! The crate is kept small and `#![no_std]` (it only needs an allocator) so that it can be shared
//! by the projection and fusion crates without pulling in anything else. Algorithms that consume
//! these types live in `ttc-projection` and `ttc-fusion`.
//!
//! ## Coordinate frames
//!
//! Range points use the sensor frame of a forward facing lidar:
//!
//! - `x` points forwards (longitudinal distance to the object)
//! - `y` points left (lateral offset, used to restrict points to the ego lane)
//! - `z` points up
//!
//! Keypoints and regions of interest are in pixel coordinates of the rectified camera image,
//! with `x` pointing right and `y` pointing down.
//!
//! ```text
//!              z
//!              |   x
//!              |  /
//!              | /
//!     y -------O      lidar
//! ```

#![no_std]

extern crate alloc;

mod frame;
mod keypoint;
mod point;
mod projection;
mod roi;

pub use frame::*;
pub use keypoint::*;
pub use nalgebra;
pub use point::*;
pub use projection::*;
pub use roi::*;
