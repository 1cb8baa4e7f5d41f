//! The JSON scene format read by the tool.

use serde::{Deserialize, Serialize};
use ttc_core::nalgebra::{Matrix3, Matrix3x4};
use ttc_core::DataFrame;
use ttc_fusion::{EstimationError, ObjectTtc, TimeToCollision};
use ttc_projection::LidarCameraProjection;

/// Calibration matrices, written row by row.
#[derive(Debug, Clone, Deserialize)]
pub struct Calibration {
    /// `P_rect`, the projection matrix of the rectified camera.
    pub projection: [[f64; 4]; 3],
    /// `R_rect`, the rectifying rotation.
    pub rectification: [[f64; 3]; 3],
    /// `[R | t]` from the range sensor into the camera.
    pub rigid_transform: [[f64; 4]; 3],
}

impl Calibration {
    pub fn projection(&self) -> LidarCameraProjection {
        LidarCameraProjection::from_rigid_transform(
            Matrix3x4::from_fn(|r, c| self.projection[r][c]),
            Matrix3::from_fn(|r, c| self.rectification[r][c]),
            Matrix3x4::from_fn(|r, c| self.rigid_transform[r][c]),
        )
    }
}

/// A recorded sequence of frames.
///
/// Without a calibration the KITTI 2011_09_26 calibration is used.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub calibration: Option<Calibration>,
    pub frames: Vec<DataFrame>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EstimateReport {
    Collision { seconds: f64 },
    NotApproaching,
    Failed { reason: String },
}

impl EstimateReport {
    fn new(ttc: Result<TimeToCollision, EstimationError>) -> Self {
        match ttc {
            Ok(TimeToCollision::Seconds(seconds)) => EstimateReport::Collision { seconds },
            Ok(TimeToCollision::NotApproaching) => EstimateReport::NotApproaching,
            Err(e) => EstimateReport::Failed {
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ObjectReport {
    pub previous_box: usize,
    pub current_box: usize,
    pub votes: usize,
    pub lidar: EstimateReport,
    pub camera: EstimateReport,
}

impl From<&ObjectTtc> for ObjectReport {
    fn from(object: &ObjectTtc) -> Self {
        Self {
            previous_box: object.link.previous,
            current_box: object.link.current,
            votes: object.link.votes,
            lidar: EstimateReport::new(object.lidar.map(|lidar| lidar.ttc)),
            camera: EstimateReport::new(object.camera.map(|camera| camera.ttc)),
        }
    }
}

/// One line of output per frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    pub objects: Vec<ObjectReport>,
}
