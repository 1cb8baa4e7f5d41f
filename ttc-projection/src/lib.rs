//! This crate plugs into `ttc-core` and maps range sensor points onto the rectified image of a camera.
//!
//! The calibration chain is the one used by rectified stereo rigs such as KITTI:
//!
//! ```text
//! pixel = P_rect · R_rect · RT · [x, y, z, 1]ᵀ
//! ```
//!
//! - `RT` is the rigid transform from the range sensor frame into the camera frame
//! - `R_rect` is the rectifying rotation of the camera
//! - `P_rect` is the 3x4 projection matrix of the rectified camera
//!
//! The result is homogeneous and is divided by its third component, which is the depth of
//! the point in front of the camera. Points at or behind the camera plane do not project.

#![no_std]

use derive_more::{AsRef, Deref};
use nalgebra::{Matrix3, Matrix3x4, Matrix4, Point2};
use ttc_core::{KeyPoint, PointProjection, RangePoint};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The calibrated projection from the range sensor frame into pixel coordinates.
///
/// The three calibration matrices are multiplied once at construction and only the
/// resulting 3x4 matrix is kept.
///
/// ```
/// use ttc_core::{PointProjection, RangePoint};
/// use ttc_core::nalgebra::{Matrix3, Matrix3x4, Matrix4};
/// use ttc_projection::LidarCameraProjection;
///
/// // Camera looking down the range sensor's x axis, focal length 100, principal point (50, 50).
/// #[rustfmt::skip]
/// let projection = Matrix3x4::new(
///     100.0, 0.0,   50.0, 0.0,
///     0.0,   100.0, 50.0, 0.0,
///     0.0,   0.0,   1.0,  0.0,
/// );
/// #[rustfmt::skip]
/// let extrinsic = Matrix4::new(
///     0.0, -1.0, 0.0,  0.0,
///     0.0, 0.0,  -1.0, 0.0,
///     1.0, 0.0,  0.0,  0.0,
///     0.0, 0.0,  0.0,  1.0,
/// );
/// let camera = LidarCameraProjection::new(projection, Matrix3::identity(), extrinsic);
///
/// let pixel = camera.project(&RangePoint::new(10.0, 1.0, 0.0)).unwrap();
/// assert_eq!((pixel.x, pixel.y), (40.0, 50.0));
/// assert!(camera.project(&RangePoint::new(-10.0, 1.0, 0.0)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, AsRef, Deref)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LidarCameraProjection(Matrix3x4<f64>);

impl LidarCameraProjection {
    /// Combines the rectified projection matrix, the rectifying rotation and the
    /// sensor-to-camera rigid transform.
    pub fn new(projection: Matrix3x4<f64>, rectification: Matrix3<f64>, extrinsic: Matrix4<f64>) -> Self {
        Self(projection * rectification.to_homogeneous() * extrinsic)
    }

    /// Same as [`LidarCameraProjection::new`], but takes the extrinsic transform as the
    /// `[R | t]` 3x4 matrix typically found in calibration files.
    pub fn from_rigid_transform(
        projection: Matrix3x4<f64>,
        rectification: Matrix3<f64>,
        rigid_transform: Matrix3x4<f64>,
    ) -> Self {
        let mut extrinsic = Matrix4::identity();
        extrinsic
            .fixed_slice_mut::<3, 4>(0, 0)
            .copy_from(&rigid_transform);
        Self::new(projection, rectification, extrinsic)
    }

    /// Uses an already combined 3x4 projection.
    pub fn from_matrix(matrix: Matrix3x4<f64>) -> Self {
        Self(matrix)
    }

    /// The calibration of camera 0 and the Velodyne of the KITTI 2011_09_26 drives.
    #[rustfmt::skip]
    pub fn kitti_2011_09_26() -> Self {
        let projection = Matrix3x4::new(
            7.215377e+02, 0.000000e+00, 6.095593e+02, 0.000000e+00,
            0.000000e+00, 7.215377e+02, 1.728540e+02, 0.000000e+00,
            0.000000e+00, 0.000000e+00, 1.000000e+00, 0.000000e+00,
        );
        let rectification = Matrix3::new(
            9.999239e-01, 9.837760e-03, -7.445048e-03,
            -9.869795e-03, 9.999421e-01, -4.278459e-03,
            7.402527e-03, 4.351614e-03, 9.999631e-01,
        );
        let rigid_transform = Matrix3x4::new(
            7.533745e-03, -9.999714e-01, -6.166020e-04, -4.069766e-03,
            1.480249e-02, 7.280733e-04, -9.998902e-01, -7.631618e-02,
            9.998621e-01, 7.523790e-03, 1.480755e-02, -2.717806e-01,
        );
        Self::from_rigid_transform(projection, rectification, rigid_transform)
    }

    pub fn matrix(&self) -> Matrix3x4<f64> {
        self.0
    }

    /// Depth of the point in front of the camera, before the perspective divide.
    pub fn depth(&self, point: &RangePoint) -> f64 {
        (self.0 * point.homogeneous()).z
    }
}

impl PointProjection for LidarCameraProjection {
    fn project(&self, point: &RangePoint) -> Option<KeyPoint> {
        let image = self.0 * point.homogeneous();
        // Also rejects a NaN depth.
        if !(image.z > 0.0) {
            return None;
        }
        let pixel = Point2::new(image.x / image.z, image.y / image.z);
        if pixel.x.is_finite() && pixel.y.is_finite() {
            Some(KeyPoint(pixel))
        } else {
            None
        }
    }
}
