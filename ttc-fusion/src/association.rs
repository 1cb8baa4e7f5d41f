//! Linking the bounding boxes of consecutive frames by keypoint match votes.

use crate::{maximum_weight_assignment, LinkStrategy};
use derive_more::{AsRef, Deref, From, Into};
use itertools::Itertools;
use log::*;
use nalgebra::DMatrix;
use ttc_core::{BoxLink, DataFrame, KeyPointMatch};

/// Votes of keypoint matches for each pair of previous-frame box (row) and
/// current-frame box (column), indexed by the boxes' positions in their frames.
#[derive(Debug, Clone, PartialEq, Eq, AsRef, Deref, From, Into)]
pub struct VoteMatrix(pub DMatrix<usize>);

impl VoteMatrix {
    /// Counts, for every pair of boxes, the matches whose previous keypoint lies in the
    /// previous box and whose current keypoint lies in the current box.
    ///
    /// A match within several overlapping boxes votes for every combination of them.
    /// Matches that refer to missing keypoints are skipped.
    pub fn new(matches: &[KeyPointMatch], previous: &DataFrame, current: &DataFrame) -> Self {
        let mut votes = DMatrix::zeros(
            previous.bounding_boxes.len(),
            current.bounding_boxes.len(),
        );
        let mut invalid = 0;
        let mut previous_boxes = Vec::new();
        for m in matches {
            let (previous_keypoint, current_keypoint) = match current.matched_pair(previous, m) {
                Some(pair) => pair,
                None => {
                    invalid += 1;
                    continue;
                }
            };
            previous_boxes.clear();
            previous_boxes.extend(
                previous
                    .bounding_boxes
                    .iter()
                    .positions(|bb| bb.roi.contains(&previous_keypoint)),
            );
            if previous_boxes.is_empty() {
                continue;
            }
            for (col, bb) in current.bounding_boxes.iter().enumerate() {
                if bb.roi.contains(&current_keypoint) {
                    for &row in &previous_boxes {
                        votes[(row, col)] += 1;
                    }
                }
            }
        }
        if invalid != 0 {
            warn!("skipped {} matches referring to missing keypoints", invalid);
        }
        Self(votes)
    }

    pub fn votes(&self, previous: usize, current: usize) -> usize {
        self.0[(previous, current)]
    }

    /// The column with the most votes in `row`, along with its votes.
    ///
    /// Ties go to the lowest column index.
    pub fn row_maximum(&self, row: usize) -> Option<(usize, usize)> {
        self.0
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (col, votes)| match best {
                Some((_, best_votes)) if best_votes >= votes => best,
                _ => Some((col, votes)),
            })
    }

    /// Selects `(row, column, votes)` links whose votes exceed `min_votes`.
    pub fn links(&self, min_votes: usize, strategy: LinkStrategy) -> Vec<(usize, usize, usize)> {
        match strategy {
            LinkStrategy::BestPerPrevious => (0..self.0.nrows())
                .filter_map(|row| {
                    let (col, votes) = self.row_maximum(row)?;
                    (votes > min_votes).then(|| (row, col, votes))
                })
                .collect(),
            LinkStrategy::Unique => {
                let weights = self.0.map(|votes| if votes > min_votes { votes } else { 0 });
                maximum_weight_assignment(&weights)
                    .into_iter()
                    .map(|(row, col)| (row, col, weights[(row, col)]))
                    .filter(|&(_, _, votes)| votes != 0)
                    .collect()
            }
        }
    }
}

/// Finds the box in the current frame that corresponds to each box of the previous frame.
///
/// Every previous box is linked to at most one current box. Previous boxes whose best
/// candidate has `min_votes` votes or fewer are left out.
pub fn match_bounding_boxes(
    matches: &[KeyPointMatch],
    previous: &DataFrame,
    current: &DataFrame,
    min_votes: usize,
    strategy: LinkStrategy,
) -> Vec<BoxLink> {
    let votes = VoteMatrix::new(matches, previous, current);
    let links: Vec<BoxLink> = votes
        .links(min_votes, strategy)
        .into_iter()
        .map(|(row, col, votes)| BoxLink {
            previous: previous.bounding_boxes[row].id,
            current: current.bounding_boxes[col].id,
            votes,
        })
        .collect();
    debug!(
        "linked {} of {} previous boxes to {} current boxes",
        links.len(),
        previous.bounding_boxes.len(),
        current.bounding_boxes.len()
    );
    links
}
