use crate::{check_frame_rate, EstimationError, FrameSide, TimeToCollision};
use float_ord::FloatOrd;
use log::*;
use ttc_core::RangePoint;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Longitudinal distance statistics of the range points within the ego lane.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneDistance {
    /// The smallest `x`.
    pub closest: f64,
    /// The mean `x`.
    pub mean: f64,
    /// The number of points within the lane.
    pub points: usize,
}

impl LaneDistance {
    /// Computes the statistics of the points with `|y| <= lane_width / 2`.
    ///
    /// Returns `None` if no point lies within the lane.
    pub fn new(points: &[RangePoint], lane_width: f64) -> Option<Self> {
        let half_width = lane_width / 2.0;
        let in_lane = || points.iter().filter(move |point| point.y.abs() <= half_width);
        let FloatOrd(closest) = in_lane().map(|point| FloatOrd(point.x)).min()?;
        let count = in_lane().count();
        Some(Self {
            closest,
            mean: in_lane().map(|point| point.x).sum::<f64>() / count as f64,
            points: count,
        })
    }
}

/// A lidar time-to-collision estimate along with the distances it was derived from.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarTtc {
    pub ttc: TimeToCollision,
    pub previous: LaneDistance,
    pub current: LaneDistance,
    /// Distance closed per second, positive when approaching.
    pub closing_velocity: f64,
}

/// Estimates time-to-collision from the range points of an object in two consecutive frames.
///
/// Only points within a lane centered on the sensor are used, which assumes the object
/// stays ahead of the platform. The mean distance of each frame gives the closing velocity,
/// since it is less sensitive to a single stray point than the minimum, and the time is the
/// closest current distance over that velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LidarTtcEstimator {
    lane_width: f64,
}

impl LidarTtcEstimator {
    /// Creates a `LidarTtcEstimator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the width of the ego lane.
    ///
    /// Default is `4.0`.
    #[must_use]
    pub fn lane_width(self, lane_width: f64) -> Self {
        Self { lane_width }
    }

    /// ```
    /// use ttc_core::RangePoint;
    /// use ttc_fusion::{LidarTtcEstimator, TimeToCollision};
    ///
    /// let previous = [RangePoint::new(8.0, 0.5, 0.0), RangePoint::new(8.2, -0.5, 0.0)];
    /// let current = [RangePoint::new(7.9, 0.5, 0.0), RangePoint::new(8.1, -0.5, 0.0)];
    /// let estimate = LidarTtcEstimator::new().estimate(&previous, &current, 10.0).unwrap();
    /// let seconds = estimate.ttc.seconds().unwrap();
    /// assert!((seconds - 7.9).abs() < 1e-9);
    /// ```
    pub fn estimate(
        &self,
        previous: &[RangePoint],
        current: &[RangePoint],
        frame_rate: f64,
    ) -> Result<LidarTtc, EstimationError> {
        check_frame_rate(frame_rate)?;
        let previous_distance = LaneDistance::new(previous, self.lane_width)
            .ok_or(EstimationError::EmptyLane(FrameSide::Previous))?;
        let current_distance = LaneDistance::new(current, self.lane_width)
            .ok_or(EstimationError::EmptyLane(FrameSide::Current))?;
        if !(current_distance.closest > 0.0) {
            return Err(EstimationError::NonPositiveDistance(
                current_distance.closest,
            ));
        }
        let closing_velocity = (previous_distance.mean - current_distance.mean) * frame_rate;
        debug!(
            "lidar: previous {:?}, current {:?}, closing velocity {}",
            previous_distance, current_distance, closing_velocity
        );
        if !closing_velocity.is_finite() {
            return Err(EstimationError::NonFiniteVelocity(closing_velocity));
        }
        let ttc = if closing_velocity > 0.0 {
            let seconds = current_distance.closest / closing_velocity;
            if !seconds.is_finite() {
                return Err(EstimationError::NonFiniteVelocity(closing_velocity));
            }
            TimeToCollision::Seconds(seconds)
        } else {
            TimeToCollision::NotApproaching
        };
        Ok(LidarTtc {
            ttc,
            previous: previous_distance,
            current: current_distance,
            closing_velocity,
        })
    }
}

impl Default for LidarTtcEstimator {
    fn default() -> Self {
        Self { lane_width: 4.0 }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn wall(x: f64, ys: &[f64]) -> Vec<RangePoint> {
        ys.iter().map(|&y| RangePoint::new(x, y, 0.0)).collect()
    }

    #[test]
    fn lane_statistics_ignore_points_outside_the_lane() {
        let mut points = wall(10.0, &[-2.0, 0.0, 2.0]);
        points.push(RangePoint::new(9.0, 0.3, 0.0));
        points.push(RangePoint::new(1.0, 2.5, 0.0));
        points.push(RangePoint::new(1.0, -3.0, 0.0));
        let lane = LaneDistance::new(&points, 4.0).unwrap();
        assert_eq!(lane.points, 4);
        assert_eq!(lane.closest, 9.0);
        assert_relative_eq!(lane.mean, 9.75);
    }

    #[test]
    fn ttc_is_closest_over_closing_velocity() {
        let mut previous = wall(8.0, &[-1.0, 0.0, 1.0]);
        previous.push(RangePoint::new(8.6, 0.5, 0.0));
        let mut current = wall(7.9, &[-1.0, 0.0, 1.0]);
        current.push(RangePoint::new(7.7, 0.5, 0.0));
        let frame_rate = 10.0;
        let estimate = LidarTtcEstimator::new()
            .estimate(&previous, &current, frame_rate)
            .unwrap();
        let mean_previous = (3.0 * 8.0 + 8.6) / 4.0;
        let mean_current = (3.0 * 7.9 + 7.7) / 4.0;
        let velocity = (mean_previous - mean_current) * frame_rate;
        assert_relative_eq!(estimate.closing_velocity, velocity, epsilon = 1e-12);
        assert_relative_eq!(
            estimate.ttc.seconds().unwrap(),
            7.7 / velocity,
            epsilon = 1e-9
        );
        assert_eq!(estimate.current.closest, 7.7);
        assert!(estimate.ttc.is_approaching());
    }

    #[test]
    fn receding_object_is_not_approaching() {
        let previous = wall(8.0, &[0.0]);
        let current = wall(8.5, &[0.0]);
        let estimate = LidarTtcEstimator::new()
            .estimate(&previous, &current, 10.0)
            .unwrap();
        assert_eq!(estimate.ttc, TimeToCollision::NotApproaching);
        assert!(!estimate.ttc.is_approaching());
        assert!(estimate.closing_velocity < 0.0);
    }

    #[test]
    fn stationary_object_is_not_approaching() {
        let points = wall(8.0, &[0.0, 1.0]);
        let estimate = LidarTtcEstimator::new()
            .estimate(&points, &points, 10.0)
            .unwrap();
        assert_eq!(estimate.ttc, TimeToCollision::NotApproaching);
    }

    #[test]
    fn empty_lane_is_an_error() {
        let inside = wall(8.0, &[0.0]);
        let outside = wall(8.0, &[5.0]);
        let estimator = LidarTtcEstimator::new();
        assert_eq!(
            estimator.estimate(&outside, &inside, 10.0),
            Err(EstimationError::EmptyLane(FrameSide::Previous))
        );
        assert_eq!(
            estimator.estimate(&inside, &[], 10.0),
            Err(EstimationError::EmptyLane(FrameSide::Current))
        );
    }

    #[test]
    fn lane_width_is_configurable() {
        let previous = wall(8.0, &[0.0, 2.5]);
        let current = wall(7.0, &[0.0, 2.5]);
        let narrow = LidarTtcEstimator::new().estimate(&previous, &current, 1.0).unwrap();
        let wide = LidarTtcEstimator::new()
            .lane_width(6.0)
            .estimate(&previous, &current, 1.0)
            .unwrap();
        assert_eq!(narrow.current.points, 1);
        assert_eq!(wide.current.points, 2);
    }

    #[test]
    fn closest_point_at_or_behind_the_sensor_is_an_error() {
        let previous = vec![RangePoint::new(2.0, 0.0, 0.0), RangePoint::new(2.0, 0.5, 0.0)];
        let current = vec![RangePoint::new(-0.5, 0.0, 0.0), RangePoint::new(1.5, 0.5, 0.0)];
        let estimator = LidarTtcEstimator::new();
        assert_eq!(
            estimator.estimate(&previous, &current, 10.0),
            Err(EstimationError::NonPositiveDistance(-0.5))
        );
        let touching = wall(0.0, &[0.0]);
        assert_eq!(
            estimator.estimate(&previous, &touching, 10.0),
            Err(EstimationError::NonPositiveDistance(0.0))
        );
    }

    #[test]
    fn frame_rate_must_be_finite_and_positive() {
        let previous = wall(8.0, &[0.0]);
        let current = wall(7.9, &[0.0]);
        let estimator = LidarTtcEstimator::new();
        for frame_rate in [0.0, -10.0, f64::INFINITY] {
            assert_eq!(
                estimator.estimate(&previous, &current, frame_rate),
                Err(EstimationError::InvalidFrameRate(frame_rate))
            );
        }
        assert!(matches!(
            estimator.estimate(&previous, &current, f64::NAN),
            Err(EstimationError::InvalidFrameRate(_))
        ));
    }
}
