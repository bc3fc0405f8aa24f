//! False acceptance / false rejection rates and the Equal Error Rate
//!
//! FAR and FRR are step functions of the threshold, so there is no closed form
//! for the crossing point. The EER is found by an exhaustive sweep over a fixed
//! grid on [0, 1], keeping the first grid point with the smallest |FAR - FRR|.

use crate::scores::LabeledScores;
use serde::{Deserialize, Serialize};
use tracing::debug;
use veriface_core::{Error, Result, ThresholdPolicy};

/// Reference sweep resolution
pub const DEFAULT_GRID_POINTS: usize = 100;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ErrorRates {
    /// Fraction of impostor pairs accepted
    pub far: f32,
    /// Fraction of genuine pairs rejected
    pub frr: f32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct EqualErrorRate {
    /// `(FAR + FRR) / 2` at the selected grid point
    pub eer: f32,
    /// Grid point where |FAR - FRR| is smallest
    pub threshold: f32,
    /// Rates at `threshold`
    pub rates: ErrorRates,
}

/// `points` evenly spaced thresholds from 0.0 to 1.0 inclusive
pub fn threshold_grid(points: usize) -> Result<impl Iterator<Item = f32>> {
    if points < 2 {
        return Err(Error::InvalidConfig(format!(
            "threshold grid needs at least 2 points, got {points}"
        )));
    }
    let step = 1.0 / (points - 1) as f64;
    Ok((0..points).map(move |i| (i as f64 * step) as f32))
}

impl LabeledScores {
    /// EER over a `grid_points` sweep
    pub fn equal_error_rate(&self, grid_points: usize) -> Result<EqualErrorRate> {
        let mut best = EqualErrorRate::default();
        let mut min_diff = f32::INFINITY;

        for threshold in threshold_grid(grid_points)? {
            let rates = self.far_frr(threshold);
            let diff = (rates.far - rates.frr).abs();
            if diff < min_diff {
                min_diff = diff;
                best = EqualErrorRate {
                    eer: (rates.far + rates.frr) / 2.0,
                    threshold,
                    rates,
                };
            }
        }

        debug!(
            eer = best.eer,
            threshold = best.threshold,
            genuine = self.genuine().len(),
            impostor = self.impostor().len(),
            "equal error rate sweep finished"
        );
        Ok(best)
    }
}

/// FAR/FRR for labeled scores at `threshold`
pub fn far_frr(scores: &[f32], labels: &[bool], threshold: f32) -> Result<ErrorRates> {
    let policy = ThresholdPolicy::new(threshold)?;
    Ok(LabeledScores::new(scores, labels)?.far_frr(policy.threshold()))
}

/// EER with the default 100-point sweep
pub fn equal_error_rate(scores: &[f32], labels: &[bool]) -> Result<EqualErrorRate> {
    LabeledScores::new(scores, labels)?.equal_error_rate(DEFAULT_GRID_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_separation() {
        let rates = far_frr(&[0.95, 0.90, 0.10, 0.05], &[true, true, false, false], 0.5).unwrap();
        assert_eq!(rates.far, 0.0);
        assert_eq!(rates.frr, 0.0);
    }

    #[test]
    fn test_all_impostors_accepted() {
        let rates = far_frr(&[0.9, 0.9], &[false, false], 0.5).unwrap();
        assert_eq!(rates.far, 1.0);
        assert_eq!(rates.frr, 0.0);
    }

    #[test]
    fn test_partial_rates() {
        let scores = [0.9, 0.6, 0.8, 0.3, 0.7, 0.2];
        let labels = [true, true, true, false, false, false];
        let rates = far_frr(&scores, &labels, 0.65).unwrap();
        assert!((rates.far - 1.0 / 3.0).abs() < 1e-6);
        assert!((rates.frr - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(matches!(
            far_frr(&[0.5], &[true], 1.5),
            Err(Error::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_grid_endpoints() {
        let grid: Vec<f32> = threshold_grid(100).unwrap().collect();
        assert_eq!(grid.len(), 100);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[99], 1.0);
        assert!(threshold_grid(1).is_err());
    }

    #[test]
    fn test_eer_separated_set() {
        let eer = equal_error_rate(&[0.9, 0.8, 0.4, 0.3], &[true, true, false, false]).unwrap();
        assert_eq!(eer.eer, 0.0);
        // first grid point above 0.4 is 40/99
        assert!((eer.threshold - 40.0 / 99.0).abs() < 1e-6);
        assert!(eer.threshold > 0.4 && eer.threshold <= 0.8);
    }

    #[test]
    fn test_eer_overlapping_set() {
        // one impostor above one genuine: best achievable crossing is 1/3
        let scores = [0.9, 0.8, 0.55, 0.6, 0.3, 0.2];
        let labels = [true, true, true, false, false, false];
        let eer = equal_error_rate(&scores, &labels).unwrap();
        assert!((eer.eer - 1.0 / 3.0).abs() < 1e-6);
        assert!(eer.threshold > 0.55 && eer.threshold <= 0.6);
        assert_eq!(eer.rates.far, eer.rates.frr);
    }

    #[test]
    fn test_eer_empty_input() {
        let eer = equal_error_rate(&[], &[]).unwrap();
        assert_eq!(eer.eer, 0.0);
        assert_eq!(eer.threshold, 0.0);
    }
}
