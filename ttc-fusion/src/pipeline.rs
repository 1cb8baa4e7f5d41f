use crate::{
    cluster_keypoint_matches, cluster_range_points, match_bounding_boxes, CameraTtc,
    CameraTtcEstimator, ClusterStats, EstimationError, FusionSettings, LidarTtc,
    LidarTtcEstimator, SettingsError,
};
use log::*;
use ttc_core::{BoxLink, DataFrame, PointProjection};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Both time-to-collision estimates of one object tracked across a frame pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTtc {
    pub link: BoxLink,
    pub lidar: Result<LidarTtc, EstimationError>,
    pub camera: Result<CameraTtc, EstimationError>,
}

/// Runs clustering, box linking and both estimators for pairs of frames.
///
/// A frame is clustered once with [`TtcPipeline::cluster_frame`] when it arrives. After that its
/// range points are fixed and it can serve as the current frame and later as the previous frame.
#[derive(Debug, Clone)]
pub struct TtcPipeline<P> {
    projection: P,
    settings: FusionSettings,
    lidar: LidarTtcEstimator,
    camera: CameraTtcEstimator,
}

impl<P> TtcPipeline<P>
where
    P: PointProjection,
{
    pub fn new(projection: P, settings: FusionSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            projection,
            settings,
            lidar: LidarTtcEstimator::new().lane_width(settings.lane_width),
            camera: CameraTtcEstimator::new()
                .min_keypoint_separation(settings.min_keypoint_separation)
                .min_scale_change(settings.min_scale_change)
                .min_matches(settings.min_keypoint_matches),
        })
    }

    pub fn settings(&self) -> &FusionSettings {
        &self.settings
    }

    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Assigns the range points of the frame to its bounding boxes.
    pub fn cluster_frame(&self, frame: &mut DataFrame) -> ClusterStats {
        cluster_range_points(&self.projection, frame, self.settings.shrink_factor)
    }

    /// Links the boxes of `previous` to the boxes of `current` using `current.matches`.
    pub fn link_frames(&self, previous: &DataFrame, current: &DataFrame) -> Vec<BoxLink> {
        match_bounding_boxes(
            &current.matches,
            previous,
            current,
            self.settings.min_box_votes,
            self.settings.link_strategy,
        )
    }

    /// Estimates time-to-collision for every object linked between the two clustered frames.
    ///
    /// The linked boxes of `current` receive the keypoint matches within them, after which
    /// both frames are only read.
    pub fn estimate(&self, previous: &DataFrame, current: &mut DataFrame) -> Vec<ObjectTtc> {
        let links = self.link_frames(previous, current);
        let DataFrame {
            bounding_boxes,
            keypoints,
            matches,
            ..
        } = &mut *current;
        for link in &links {
            if let Some(bb) = bounding_boxes.iter_mut().find(|bb| bb.id == link.current) {
                cluster_keypoint_matches(bb, keypoints, matches);
            }
        }

        let current: &DataFrame = current;
        let lidar = self.lidar;
        let camera = self.camera;
        let frame_rate = self.settings.frame_rate;
        let estimate_link = |link: &BoxLink| {
            let previous_box = previous.bounding_box(link.previous)?;
            let current_box = current.bounding_box(link.current)?;
            Some(ObjectTtc {
                link: *link,
                lidar: lidar.estimate(
                    &previous_box.range_points,
                    &current_box.range_points,
                    frame_rate,
                ),
                camera: camera.estimate(
                    &previous.keypoints,
                    &current.keypoints,
                    &current_box.keypoint_matches,
                    frame_rate,
                ),
            })
        };

        #[cfg(not(feature = "rayon"))]
        let objects: Vec<ObjectTtc> = links.iter().filter_map(estimate_link).collect();
        #[cfg(feature = "rayon")]
        let objects: Vec<ObjectTtc> = links.par_iter().filter_map(estimate_link).collect();

        for object in &objects {
            info!(
                "box {} -> {} ({} votes): lidar {:?}, camera {:?}",
                object.link.previous,
                object.link.current,
                object.link.votes,
                object.lidar.as_ref().map(|lidar| lidar.ttc),
                object.camera.as_ref().map(|camera| camera.ttc)
            );
        }
        objects
    }
}

/// Keeps the previous frame around so frames can be fed in one at a time.
#[derive(Debug, Clone)]
pub struct TtcTracker<P> {
    pipeline: TtcPipeline<P>,
    previous: Option<DataFrame>,
}

impl<P> TtcTracker<P>
where
    P: PointProjection,
{
    pub fn new(pipeline: TtcPipeline<P>) -> Self {
        Self {
            pipeline,
            previous: None,
        }
    }

    pub fn pipeline(&self) -> &TtcPipeline<P> {
        &self.pipeline
    }

    /// The most recent frame, with its boxes clustered.
    pub fn previous_frame(&self) -> Option<&DataFrame> {
        self.previous.as_ref()
    }

    /// Clusters the frame and estimates against the preceding one, if there is one.
    ///
    /// The frame then becomes the previous frame for the next call.
    pub fn push_frame(&mut self, mut frame: DataFrame) -> Vec<ObjectTtc> {
        let stats = self.pipeline.cluster_frame(&mut frame);
        debug!(
            "clustered {} of {} range points into {} boxes",
            stats.assigned,
            frame.range_points.len(),
            frame.bounding_boxes.len()
        );
        let objects = match &self.previous {
            Some(previous) => self.pipeline.estimate(previous, &mut frame),
            None => Vec::new(),
        };
        self.previous = Some(frame);
        objects
    }

    /// Forgets the previous frame, so the next frame starts a new sequence.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
