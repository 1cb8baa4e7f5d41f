//! Assignment of range points and keypoint matches to the bounding boxes of a frame.

use log::*;
use ttc_core::{BoundingBox, DataFrame, KeyPoint, KeyPointMatch, PointProjection, RangePoint, Roi};

/// How a single range point relates to the boxes of its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAssignment {
    /// The point is in no box, or it does not project into the image at all.
    Unassigned,
    /// The point is in exactly one box, given by its index in the frame.
    Assigned(usize),
    /// The point is in more than one box and cannot be attributed to either.
    Ambiguous,
}

impl PointAssignment {
    fn enclosed_by(self, index: usize) -> Self {
        match self {
            PointAssignment::Unassigned => PointAssignment::Assigned(index),
            PointAssignment::Assigned(_) | PointAssignment::Ambiguous => PointAssignment::Ambiguous,
        }
    }
}

/// Counts of a range point clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClusterStats {
    pub assigned: usize,
    pub unassigned: usize,
    pub ambiguous: usize,
}

/// Decides for every range point which box it belongs to, without modifying any box.
///
/// Points are projected into the image and tested against every box shrunk by
/// `shrink_factor`. Every enclosing region is counted before deciding, so a point
/// within two overlapping boxes is [`PointAssignment::Ambiguous`] regardless of box order.
pub fn classify_range_points<P>(
    projection: &P,
    boxes: &[BoundingBox],
    points: &[RangePoint],
    shrink_factor: f64,
) -> Vec<PointAssignment>
where
    P: PointProjection + ?Sized,
{
    let regions: Vec<Roi> = boxes.iter().map(|bb| bb.roi.shrink(shrink_factor)).collect();
    points
        .iter()
        .map(|point| match projection.project(point) {
            Some(pixel) => regions
                .iter()
                .enumerate()
                .filter(|(_, region)| region.contains(&pixel))
                .fold(PointAssignment::Unassigned, |assignment, (ix, _)| {
                    assignment.enclosed_by(ix)
                }),
            None => PointAssignment::Unassigned,
        })
        .collect()
}

/// Replaces the range points of every box with the points assigned to it.
///
/// `assignments` must come from [`classify_range_points`] for the same boxes and points.
pub fn commit_range_points(
    boxes: &mut [BoundingBox],
    points: &[RangePoint],
    assignments: &[PointAssignment],
) -> ClusterStats {
    for bb in boxes.iter_mut() {
        bb.range_points.clear();
    }
    let mut stats = ClusterStats::default();
    for (point, assignment) in points.iter().zip(assignments) {
        match *assignment {
            PointAssignment::Assigned(ix) => {
                boxes[ix].range_points.push(*point);
                stats.assigned += 1;
            }
            PointAssignment::Unassigned => stats.unassigned += 1,
            PointAssignment::Ambiguous => stats.ambiguous += 1,
        }
    }
    stats
}

/// Groups the range points of the frame by the box their projection falls into.
///
/// Running this again on the same frame gives the same result, since the boxes'
/// previous range points are discarded on commit.
pub fn cluster_range_points<P>(projection: &P, frame: &mut DataFrame, shrink_factor: f64) -> ClusterStats
where
    P: PointProjection + ?Sized,
{
    let assignments = classify_range_points(
        projection,
        &frame.bounding_boxes,
        &frame.range_points,
        shrink_factor,
    );
    let stats = commit_range_points(&mut frame.bounding_boxes, &frame.range_points, &assignments);
    trace!(
        "range points: {} assigned, {} outside all boxes, {} ambiguous",
        stats.assigned,
        stats.unassigned,
        stats.ambiguous
    );
    stats
}

/// Associates the box with every match whose current keypoint lies within its region.
///
/// The region is used as is, without shrinking. The box's previous keypoints and matches
/// are replaced. Returns the number of matches now held by the box.
pub fn cluster_keypoint_matches(
    bounding_box: &mut BoundingBox,
    current_keypoints: &[KeyPoint],
    matches: &[KeyPointMatch],
) -> usize {
    bounding_box.keypoints.clear();
    bounding_box.keypoint_matches.clear();
    let mut invalid = 0;
    for m in matches {
        let keypoint = match current_keypoints.get(m.current) {
            Some(keypoint) => keypoint,
            None => {
                invalid += 1;
                continue;
            }
        };
        if bounding_box.roi.contains(keypoint) {
            bounding_box.keypoints.push(*keypoint);
            bounding_box.keypoint_matches.push(*m);
        }
    }
    if invalid != 0 {
        warn!(
            "skipped {} matches referring to missing current keypoints",
            invalid
        );
    }
    bounding_box.keypoint_matches.len()
}

#[cfg(test)]
mod test {
    use super::*;

    /// Projects straight onto the image using `y` and `z` as pixel coordinates.
    struct Flat;

    impl PointProjection for Flat {
        fn project(&self, point: &RangePoint) -> Option<KeyPoint> {
            if point.x > 0.0 {
                Some(KeyPoint::new(point.y, point.z))
            } else {
                None
            }
        }
    }

    fn frame() -> DataFrame {
        DataFrame {
            bounding_boxes: vec![
                BoundingBox::new(0, Roi::new(0.0, 0.0, 10.0, 10.0)),
                BoundingBox::new(1, Roi::new(5.0, 0.0, 10.0, 10.0)),
                BoundingBox::new(2, Roi::new(30.0, 30.0, 10.0, 10.0)),
            ],
            range_points: vec![
                // Only in box 0.
                RangePoint::new(1.0, 2.0, 5.0),
                // Overlap of box 0 and box 1.
                RangePoint::new(1.0, 7.0, 5.0),
                // Only in box 1.
                RangePoint::new(1.0, 12.0, 5.0),
                // Nowhere.
                RangePoint::new(1.0, 20.0, 20.0),
                // Behind the sensor.
                RangePoint::new(-1.0, 2.0, 5.0),
                // Only in box 2.
                RangePoint::new(1.0, 35.0, 35.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn classification_is_tri_state() {
        let frame = frame();
        let assignments =
            classify_range_points(&Flat, &frame.bounding_boxes, &frame.range_points, 0.0);
        assert_eq!(
            assignments,
            vec![
                PointAssignment::Assigned(0),
                PointAssignment::Ambiguous,
                PointAssignment::Assigned(1),
                PointAssignment::Unassigned,
                PointAssignment::Unassigned,
                PointAssignment::Assigned(2),
            ]
        );
    }

    #[test]
    fn ambiguous_points_are_dropped() {
        let mut frame = frame();
        let stats = cluster_range_points(&Flat, &mut frame, 0.0);
        assert_eq!(
            stats,
            ClusterStats {
                assigned: 3,
                unassigned: 2,
                ambiguous: 1
            }
        );
        assert_eq!(frame.bounding_boxes[0].range_points, vec![frame.range_points[0]]);
        assert_eq!(frame.bounding_boxes[1].range_points, vec![frame.range_points[2]]);
        assert_eq!(frame.bounding_boxes[2].range_points, vec![frame.range_points[5]]);
    }

    #[test]
    fn shrinking_resolves_edge_overlap() {
        // Shrunk by half, box 0 spans [2.5, 7.5) and box 1 spans [7.5, 12.5) horizontally.
        let mut frame = frame();
        cluster_range_points(&Flat, &mut frame, 0.5);
        assert_eq!(frame.bounding_boxes[0].range_points.len(), 1);
        assert_eq!(frame.bounding_boxes[0].range_points[0].y, 7.0);
        assert_eq!(frame.bounding_boxes[1].range_points.len(), 1);
        assert_eq!(frame.bounding_boxes[1].range_points[0].y, 12.0);
    }

    #[test]
    fn clustering_twice_is_idempotent() {
        let mut frame = frame();
        cluster_range_points(&Flat, &mut frame, 0.1);
        let once = frame.bounding_boxes.clone();
        cluster_range_points(&Flat, &mut frame, 0.1);
        assert_eq!(frame.bounding_boxes, once);
    }

    #[test]
    fn keypoint_matches_use_current_keypoint_and_full_region() {
        let mut bb = BoundingBox::new(7, Roi::new(0.0, 0.0, 10.0, 10.0));
        let current = vec![
            KeyPoint::new(0.0, 0.0),
            KeyPoint::new(9.5, 9.5),
            KeyPoint::new(10.0, 5.0),
        ];
        let matches = vec![
            KeyPointMatch::new(100, 0),
            KeyPointMatch::new(101, 1),
            KeyPointMatch::new(102, 2),
            KeyPointMatch::new(103, 3),
        ];
        assert_eq!(cluster_keypoint_matches(&mut bb, &current, &matches), 2);
        assert_eq!(bb.keypoints, vec![current[0], current[1]]);
        assert_eq!(bb.keypoint_matches, vec![matches[0], matches[1]]);

        // Idempotent as well.
        assert_eq!(cluster_keypoint_matches(&mut bb, &current, &matches), 2);
        assert_eq!(bb.keypoint_matches.len(), 2);
    }
}
