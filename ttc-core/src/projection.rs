use crate::{KeyPoint, RangePoint};

/// Maps range sensor points onto the image plane of the camera.
///
/// Since a point at or behind the camera plane has no image, this operation is fallible.
/// Points that fail to project can never be enclosed by a region of interest.
pub trait PointProjection {
    /// Projects the point into pixel coordinates.
    fn project(&self, point: &RangePoint) -> Option<KeyPoint>;
}

impl<P> PointProjection for &P
where
    P: PointProjection + ?Sized,
{
    fn project(&self, point: &RangePoint) -> Option<KeyPoint> {
        (**self).project(point)
    }
}
