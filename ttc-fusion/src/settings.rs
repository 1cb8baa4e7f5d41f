#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How previous-frame boxes are linked to current-frame boxes from the vote matrix.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LinkStrategy {
    /// Every previous box independently takes the current box with the most votes.
    ///
    /// Two previous boxes may end up linked to the same current box.
    #[default]
    BestPerPrevious,
    /// Links form a one-to-one assignment that maximizes the total number of votes.
    Unique,
}

/// A setting that is outside of its valid range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SettingsError {
    #[error("frame rate must be positive and finite, got {0}")]
    FrameRate(f64),
    #[error("shrink factor must be in [0, 1), got {0}")]
    ShrinkFactor(f64),
    #[error("lane width must be positive and finite, got {0}")]
    LaneWidth(f64),
    #[error("minimum keypoint separation must be positive and finite, got {0}")]
    KeypointSeparation(f64),
    #[error("minimum scale change must be non-negative and finite, got {0}")]
    ScaleChange(f64),
    #[error("at least two keypoint matches are needed to form a pair, got {0}")]
    KeypointMatches(usize),
}

/// The settings for fusing range points and keypoint matches into time-to-collision estimates.
///
/// All of these depend on the scene and the sensors, which is why none of them are hard coded.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FusionSettings {
    /// Frames per second of the camera and range sensor
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_frame_rate"))]
    pub frame_rate: f64,
    /// The fraction by which boxes are shrunk before range points are assigned to them
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_shrink_factor"))]
    pub shrink_factor: f64,
    /// The number of votes a box link must exceed to be accepted
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_min_box_votes"))]
    pub min_box_votes: usize,
    /// How box links are chosen from the vote matrix
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub link_strategy: LinkStrategy,
    /// The width of the ego lane centered on the range sensor
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_lane_width"))]
    pub lane_width: f64,
    /// Keypoint pairs closer than this (in pixels) in the previous frame are not used for a ratio
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_min_keypoint_separation")
    )]
    pub min_keypoint_separation: f64,
    /// The smallest `|1 - ratio|` of the median distance ratio that counts as a scale change
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_min_scale_change"))]
    pub min_scale_change: f64,
    /// The minimum number of keypoint matches in a box for camera time-to-collision
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_min_keypoint_matches")
    )]
    pub min_keypoint_matches: usize,
}

impl FusionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frame_rate(self, frame_rate: f64) -> Self {
        Self { frame_rate, ..self }
    }

    #[must_use]
    pub fn shrink_factor(self, shrink_factor: f64) -> Self {
        Self {
            shrink_factor,
            ..self
        }
    }

    #[must_use]
    pub fn min_box_votes(self, min_box_votes: usize) -> Self {
        Self {
            min_box_votes,
            ..self
        }
    }

    #[must_use]
    pub fn link_strategy(self, link_strategy: LinkStrategy) -> Self {
        Self {
            link_strategy,
            ..self
        }
    }

    #[must_use]
    pub fn lane_width(self, lane_width: f64) -> Self {
        Self { lane_width, ..self }
    }

    /// Checks that every setting is within its valid range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return Err(SettingsError::FrameRate(self.frame_rate));
        }
        if !(0.0..1.0).contains(&self.shrink_factor) {
            return Err(SettingsError::ShrinkFactor(self.shrink_factor));
        }
        if !(self.lane_width.is_finite() && self.lane_width > 0.0) {
            return Err(SettingsError::LaneWidth(self.lane_width));
        }
        if !(self.min_keypoint_separation.is_finite() && self.min_keypoint_separation > 0.0) {
            return Err(SettingsError::KeypointSeparation(
                self.min_keypoint_separation,
            ));
        }
        if !(self.min_scale_change.is_finite() && self.min_scale_change >= 0.0) {
            return Err(SettingsError::ScaleChange(self.min_scale_change));
        }
        if self.min_keypoint_matches < 2 {
            return Err(SettingsError::KeypointMatches(self.min_keypoint_matches));
        }
        Ok(())
    }
}

impl Default for FusionSettings {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            shrink_factor: default_shrink_factor(),
            min_box_votes: default_min_box_votes(),
            link_strategy: LinkStrategy::default(),
            lane_width: default_lane_width(),
            min_keypoint_separation: default_min_keypoint_separation(),
            min_scale_change: default_min_scale_change(),
            min_keypoint_matches: default_min_keypoint_matches(),
        }
    }
}

fn default_frame_rate() -> f64 {
    10.0
}

fn default_shrink_factor() -> f64 {
    0.10
}

fn default_min_box_votes() -> usize {
    25
}

fn default_lane_width() -> f64 {
    4.0
}

fn default_min_keypoint_separation() -> f64 {
    1e-3
}

fn default_min_scale_change() -> f64 {
    1e-4
}

fn default_min_keypoint_matches() -> usize {
    2
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(FusionSettings::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let settings = FusionSettings::default();
        assert_eq!(
            settings.frame_rate(0.0).validate(),
            Err(SettingsError::FrameRate(0.0))
        );
        assert_eq!(
            settings.shrink_factor(1.0).validate(),
            Err(SettingsError::ShrinkFactor(1.0))
        );
        assert_eq!(
            settings.shrink_factor(-0.1).validate(),
            Err(SettingsError::ShrinkFactor(-0.1))
        );
        assert!(settings.lane_width(f64::NAN).validate().is_err());
    }
}
