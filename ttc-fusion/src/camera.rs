use crate::{check_frame_rate, EstimationError, TimeToCollision};
use float_ord::FloatOrd;
use itertools::Itertools;
use log::*;
use nalgebra::distance;
use ttc_core::{KeyPoint, KeyPointMatch};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A camera time-to-collision estimate along with the scale change it was derived from.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTtc {
    pub ttc: TimeToCollision,
    /// Median of the current over previous keypoint pair distances.
    pub median_ratio: f64,
    /// The number of keypoint pairs that contributed a ratio.
    pub ratios: usize,
}

/// The median of `values`, averaging the two middle values for an even count.
///
/// The slice is reordered in the process. Returns `None` if it is empty.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by_key(|&v| FloatOrd(v));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

/// Estimates time-to-collision from the change in scale of an object between two frames.
///
/// For every pair of keypoint matches on the object, the distance between the two current
/// keypoints is divided by the distance between the two previous keypoints. For a rigid object
/// this ratio is the same for every pair and does not depend on where the pair is in the image,
/// so lateral motion does not disturb it. The median ratio is used to reject mismatches and
/// parts of the object that move on their own; the mean would be pulled by them.
///
/// With median ratio `r` and frame rate `f`, the time-to-collision is `-1 / (f * (1 - r))`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraTtcEstimator {
    min_keypoint_separation: f64,
    min_scale_change: f64,
    min_matches: usize,
}

impl CameraTtcEstimator {
    /// Creates a `CameraTtcEstimator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the distance in pixels two previous keypoints must be apart to form a ratio.
    ///
    /// Default is `1e-3`.
    #[must_use]
    pub fn min_keypoint_separation(self, min_keypoint_separation: f64) -> Self {
        Self {
            min_keypoint_separation,
            ..self
        }
    }

    /// Set how far the median ratio must be from `1.0` to count as a change in scale.
    ///
    /// Default is `1e-4`.
    #[must_use]
    pub fn min_scale_change(self, min_scale_change: f64) -> Self {
        Self {
            min_scale_change,
            ..self
        }
    }

    /// Set the number of keypoint matches the object needs.
    ///
    /// Default is `2`, the fewest that form a pair.
    #[must_use]
    pub fn min_matches(self, min_matches: usize) -> Self {
        Self {
            min_matches: min_matches.max(2),
            ..self
        }
    }

    /// The distance ratio of every usable pair of the given matches.
    ///
    /// Matches referring to missing keypoints are ignored.
    pub fn distance_ratios(
        &self,
        previous_keypoints: &[KeyPoint],
        current_keypoints: &[KeyPoint],
        matches: &[KeyPointMatch],
    ) -> Vec<f64> {
        resolve(previous_keypoints, current_keypoints, matches)
            .tuple_combinations()
            .filter_map(|((previous_a, current_a), (previous_b, current_b))| {
                let previous_distance = distance(&previous_a.0, &previous_b.0);
                if previous_distance < self.min_keypoint_separation {
                    return None;
                }
                let ratio = distance(&current_a.0, &current_b.0) / previous_distance;
                (ratio.is_finite() && ratio > 0.0).then(|| ratio)
            })
            .collect()
    }

    /// Estimates time-to-collision from the keypoint matches of one object.
    ///
    /// ```
    /// use ttc_core::{KeyPoint, KeyPointMatch};
    /// use ttc_fusion::CameraTtcEstimator;
    ///
    /// let previous = [KeyPoint::new(0.0, 0.0), KeyPoint::new(10.0, 0.0)];
    /// let current = [KeyPoint::new(0.0, 0.0), KeyPoint::new(12.0, 0.0)];
    /// let matches = [KeyPointMatch::new(0, 0), KeyPointMatch::new(1, 1)];
    /// let estimate = CameraTtcEstimator::new()
    ///     .estimate(&previous, &current, &matches, 10.0)
    ///     .unwrap();
    /// assert!((estimate.ttc.seconds().unwrap() - 0.5).abs() < 1e-9);
    /// ```
    pub fn estimate(
        &self,
        previous_keypoints: &[KeyPoint],
        current_keypoints: &[KeyPoint],
        matches: &[KeyPointMatch],
        frame_rate: f64,
    ) -> Result<CameraTtc, EstimationError> {
        check_frame_rate(frame_rate)?;
        let found = resolve(previous_keypoints, current_keypoints, matches).count();
        if found < self.min_matches {
            return Err(EstimationError::InsufficientMatches {
                found,
                required: self.min_matches,
            });
        }
        let mut ratios = self.distance_ratios(previous_keypoints, current_keypoints, matches);
        let median_ratio = median(&mut ratios).ok_or(EstimationError::NoValidRatios {
            pairs: found * (found - 1) / 2,
        })?;
        debug!(
            "camera: {} matches, {} ratios, median ratio {}",
            found,
            ratios.len(),
            median_ratio
        );
        let scale_change = 1.0 - median_ratio;
        if scale_change.abs() < self.min_scale_change {
            return Err(EstimationError::NoScaleChange(median_ratio));
        }
        let ttc = if median_ratio > 1.0 {
            TimeToCollision::Seconds(-1.0 / (frame_rate * scale_change))
        } else {
            TimeToCollision::NotApproaching
        };
        Ok(CameraTtc {
            ttc,
            median_ratio,
            ratios: ratios.len(),
        })
    }
}

impl Default for CameraTtcEstimator {
    fn default() -> Self {
        Self {
            min_keypoint_separation: 1e-3,
            min_scale_change: 1e-4,
            min_matches: 2,
        }
    }
}

/// Looks up the previous and current keypoint of every match, skipping invalid indices.
fn resolve<'a>(
    previous_keypoints: &'a [KeyPoint],
    current_keypoints: &'a [KeyPoint],
    matches: &'a [KeyPointMatch],
) -> impl Iterator<Item = (KeyPoint, KeyPoint)> + Clone + 'a {
    matches.iter().filter_map(move |m| {
        Some((
            *previous_keypoints.get(m.previous)?,
            *current_keypoints.get(m.current)?,
        ))
    })
}
