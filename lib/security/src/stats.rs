//! Per-class similarity distribution statistics

use crate::scores::LabeledScores;
use serde::{Deserialize, Serialize};
use veriface_core::Result;

/// Summary of one group of scores.
///
/// An empty group reports zeros everywhere, never NaN.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupStats {
    pub mean: f32,
    /// Population standard deviation
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub count: usize,
}

impl GroupStats {
    /// Stats over an ascending-sorted slice
    pub(crate) fn from_sorted(sorted: &[f32]) -> Self {
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let n = sorted.len() as f64;
        let mean = sorted.iter().map(|&s| s as f64).sum::<f64>() / n;
        let variance = sorted
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Self {
            mean: mean as f32,
            std: variance.sqrt() as f32,
            min,
            max,
            count: sorted.len(),
        }
    }
}

/// Genuine vs impostor distributions
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct DistributionStats {
    pub genuine: GroupStats,
    pub impostor: GroupStats,
}

/// Distribution statistics for labeled scores
pub fn distribution_stats(scores: &[f32], labels: &[bool]) -> Result<DistributionStats> {
    Ok(LabeledScores::new(scores, labels)?.stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_stats() {
        let stats = distribution_stats(&[0.8, 0.6, 0.2, 0.4], &[true, true, false, false]).unwrap();

        assert_eq!(stats.genuine.count, 2);
        assert!((stats.genuine.mean - 0.7).abs() < 1e-6);
        assert!((stats.genuine.std - 0.1).abs() < 1e-6);
        assert_eq!(stats.genuine.min, 0.6);
        assert_eq!(stats.genuine.max, 0.8);

        assert_eq!(stats.impostor.count, 2);
        assert!((stats.impostor.mean - 0.3).abs() < 1e-6);
        assert_eq!(stats.impostor.min, 0.2);
        assert_eq!(stats.impostor.max, 0.4);
    }

    #[test]
    fn test_empty_input() {
        let stats = distribution_stats(&[], &[]).unwrap();
        assert_eq!(stats, DistributionStats::default());
    }

    #[test]
    fn test_missing_class_is_zero() {
        let stats = distribution_stats(&[0.9, 0.7], &[true, true]).unwrap();
        assert_eq!(stats.impostor, GroupStats::default());
        assert_eq!(stats.genuine.count, 2);
        assert!(!stats.impostor.mean.is_nan());
    }

    #[test]
    fn test_single_sample_has_zero_std() {
        let stats = distribution_stats(&[0.42], &[false]).unwrap();
        assert_eq!(stats.impostor.std, 0.0);
        assert_eq!(stats.impostor.min, 0.42);
        assert_eq!(stats.impostor.max, 0.42);
    }
}
