use nalgebra::{Point3, Vector4};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A single return of the range sensor.
///
/// The position is in the sensor frame with `x` forwards, `y` left and `z` up.
/// The reflectivity `r` is kept for completeness and is not used by any estimator.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RangePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub r: f64,
}

impl RangePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, r: 0.0 }
    }

    #[must_use]
    pub fn reflectivity(self, r: f64) -> Self {
        Self { r, ..self }
    }

    pub fn point(&self) -> Point3<f64> {
        Point3::new(self.x, self.y, self.z)
    }

    /// The point in homogeneous coordinates, `[x, y, z, 1]`.
    pub fn homogeneous(&self) -> Vector4<f64> {
        self.point().to_homogeneous()
    }
}

impl From<Point3<f64>> for RangePoint {
    fn from(point: Point3<f64>) -> Self {
        Self::new(point.x, point.y, point.z)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reflectivity_does_not_move_the_point() {
        let point = RangePoint::new(4.0, -1.5, 0.25).reflectivity(0.7);
        assert_eq!(point.r, 0.7);
        assert_eq!(point.point(), Point3::new(4.0, -1.5, 0.25));
        assert_eq!(point.homogeneous(), Vector4::new(4.0, -1.5, 0.25, 1.0));
        assert_eq!(RangePoint::from(point.point()), RangePoint::new(4.0, -1.5, 0.25));
    }
}
