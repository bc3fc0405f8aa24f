//! Labeled similarity scores
//!
//! Every evaluation metric reads the same two groups: genuine pairs
//! (same identity) and impostor pairs (different identities). The groups are
//! split and sorted once so that each FAR/FRR lookup is a binary search.

use crate::rates::ErrorRates;
use crate::stats::{DistributionStats, GroupStats};
use veriface_core::{Error, Result};

/// Validated, partitioned view of `(score, same_identity)` samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledScores {
    /// Sorted ascending
    genuine: Vec<f32>,
    /// Sorted ascending
    impostor: Vec<f32>,
}

impl LabeledScores {
    /// Partition `scores` by `labels`.
    ///
    /// Fails when the two slices differ in length or a score is NaN/infinite.
    /// Empty input is valid.
    pub fn new(scores: &[f32], labels: &[bool]) -> Result<Self> {
        if scores.len() != labels.len() {
            return Err(Error::ShapeMismatch {
                what: "labels",
                expected: scores.len(),
                actual: labels.len(),
            });
        }
        if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
            return Err(Error::NonFiniteScore { index });
        }

        let genuine_count = labels.iter().filter(|l| **l).count();
        let mut genuine = Vec::with_capacity(genuine_count);
        let mut impostor = Vec::with_capacity(scores.len() - genuine_count);
        for (&score, &same) in scores.iter().zip(labels) {
            if same {
                genuine.push(score);
            } else {
                impostor.push(score);
            }
        }
        genuine.sort_unstable_by(f32::total_cmp);
        impostor.sort_unstable_by(f32::total_cmp);

        Ok(Self { genuine, impostor })
    }

    pub fn genuine(&self) -> &[f32] {
        &self.genuine
    }

    pub fn impostor(&self) -> &[f32] {
        &self.impostor
    }

    pub fn len(&self) -> usize {
        self.genuine.len() + self.impostor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// FAR and FRR at `threshold`; each is 0.0 when its group is empty
    pub fn far_frr(&self, threshold: f32) -> ErrorRates {
        let impostor_rejected = self.impostor.partition_point(|&s| s < threshold);
        let false_accepts = self.impostor.len() - impostor_rejected;
        let false_rejects = self.genuine.partition_point(|&s| s < threshold);

        ErrorRates {
            far: ratio(false_accepts, self.impostor.len()),
            frr: ratio(false_rejects, self.genuine.len()),
        }
    }

    pub fn stats(&self) -> DistributionStats {
        DistributionStats {
            genuine: GroupStats::from_sorted(&self.genuine),
            impostor: GroupStats::from_sorted(&self.impostor),
        }
    }
}

#[inline]
fn ratio(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) as f32
    }
}
