use crate::ImagePoint;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An axis aligned rectangle on the image in pixel coordinates.
///
/// `x` and `y` give the top left corner. Containment is half-open, so a point on the
/// right or bottom edge is outside the region, the same as for integer pixel rectangles.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Roi {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Roi {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Checks if the point lies within `[x, x + width) × [y, y + height)`.
    ///
    /// ```
    /// use ttc_core::{KeyPoint, Roi};
    ///
    /// let roi = Roi::new(10.0, 10.0, 20.0, 5.0);
    /// assert!(roi.contains(&KeyPoint::new(10.0, 14.9)));
    /// assert!(!roi.contains(&KeyPoint::new(30.0, 12.0)));
    /// ```
    pub fn contains<P>(&self, point: &P) -> bool
    where
        P: ImagePoint,
    {
        let p = point.image_point();
        self.x <= p.x && p.x < self.x + self.width && self.y <= p.y && p.y < self.y + self.height
    }

    /// Shrinks the width and height by `factor` while keeping the region centered
    /// on the original one.
    ///
    /// Detections are least reliable around their edges, so range points are only
    /// assigned inside the shrunk region. `factor` must be in `[0, 1)`; at `0.0` the
    /// region is returned unchanged.
    ///
    /// ```
    /// use ttc_core::Roi;
    ///
    /// let shrunk = Roi::new(0.0, 0.0, 100.0, 50.0).shrink(0.2);
    /// assert_eq!(shrunk, Roi::new(10.0, 5.0, 80.0, 40.0));
    /// ```
    #[must_use]
    pub fn shrink(self, factor: f64) -> Self {
        Self {
            x: self.x + factor * self.width / 2.0,
            y: self.y + factor * self.height / 2.0,
            width: self.width * (1.0 - factor),
            height: self.height * (1.0 - factor),
        }
    }

    /// Checks if `other` lies entirely within this region.
    pub fn encloses(&self, other: &Roi) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}
