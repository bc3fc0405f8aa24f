//! Loss functions
//!
//! The triplet margin loss shapes the embedding geometry the verifier relies
//! on: a zero loss for a triplet means the negative is already farther from
//! the anchor than the positive by at least the margin. Cross-entropy over the
//! classifier head is mixed in to speed up early training.

use serde::{Deserialize, Serialize};
use veriface_core::{Error, Result, Vector};

pub const DEFAULT_MARGIN: f32 = 0.3;
pub const DEFAULT_TRIPLET_WEIGHT: f32 = 1.0;
pub const DEFAULT_CE_WEIGHT: f32 = 0.5;
pub const DEFAULT_SEED: u64 = 42;

fn check_batch(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::ShapeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_margin(margin: f32) -> Result<()> {
    if !(margin.is_finite() && margin > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "triplet margin must be positive, got {margin}"
        )));
    }
    Ok(())
}

/// Per-example `max(0, ||a-p||² - ||a-n||² + margin)`
pub fn triplet_losses(
    anchor: &[Vector],
    positive: &[Vector],
    negative: &[Vector],
    margin: f32,
) -> Result<Vec<f32>> {
    check_margin(margin)?;
    check_batch("positive batch", anchor.len(), positive.len())?;
    check_batch("negative batch", anchor.len(), negative.len())?;
    if let Some(first) = anchor.first() {
        for a in &anchor[1..] {
            first.check_same_dim(a)?;
        }
    }

    anchor
        .iter()
        .zip(positive)
        .zip(negative)
        .map(|((a, p), n)| {
            let d_pos = a.squared_l2(p)?;
            let d_neg = a.squared_l2(n)?;
            Ok((d_pos - d_neg + margin).max(0.0))
        })
        .collect()
}

/// Batch-mean triplet margin loss; 0.0 for an empty batch
pub fn triplet_loss(
    anchor: &[Vector],
    positive: &[Vector],
    negative: &[Vector],
    margin: f32,
) -> Result<f32> {
    let losses = triplet_losses(anchor, positive, negative, margin)?;
    Ok(mean(&losses))
}

/// Mean sparse softmax cross-entropy over a batch of logit rows
pub fn cross_entropy(logits: &[Vec<f32>], labels: &[usize]) -> Result<f32> {
    check_batch("labels", logits.len(), labels.len())?;
    let Some(first) = logits.first() else {
        return Ok(0.0);
    };
    let num_classes = first.len();

    let mut total = 0.0f64;
    for (row, &label) in logits.iter().zip(labels) {
        check_batch("logits row", num_classes, row.len())?;
        if label >= num_classes {
            return Err(Error::InvalidLabel { label, num_classes });
        }
        let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
        let sum_exp: f64 = row.iter().map(|&x| (x as f64 - max).exp()).sum();
        let log_sum_exp = max + sum_exp.ln();
        total += log_sum_exp - row[label] as f64;
    }

    Ok((total / logits.len() as f64) as f32)
}

/// `alpha * triplet + beta * cross_entropy`
///
/// All five inputs must share the anchor batch size.
#[allow(clippy::too_many_arguments)]
pub fn combined_loss(
    anchor: &[Vector],
    positive: &[Vector],
    negative: &[Vector],
    logits: &[Vec<f32>],
    labels: &[usize],
    margin: f32,
    alpha: f32,
    beta: f32,
) -> Result<f32> {
    let batch = anchor.len();
    check_batch("positive batch", batch, positive.len())?;
    check_batch("negative batch", batch, negative.len())?;
    check_batch("logits batch", batch, logits.len())?;
    check_batch("labels batch", batch, labels.len())?;

    let triplet = triplet_loss(anchor, positive, negative, margin)?;
    let classification = cross_entropy(logits, labels)?;
    Ok(alpha * triplet + beta * classification)
}

/// Fraction of rows whose argmax equals the label; 0.0 for an empty batch
pub fn classification_accuracy(logits: &[Vec<f32>], labels: &[usize]) -> Result<f32> {
    check_batch("labels", logits.len(), labels.len())?;
    if logits.is_empty() {
        return Ok(0.0);
    }
    let correct = logits
        .iter()
        .zip(labels)
        .filter(|(row, label)| argmax(row) == Some(**label))
        .count();
    Ok((correct as f64 / logits.len() as f64) as f32)
}

/// First index of the maximum; ties resolve to the lowest index
fn argmax(row: &[f32]) -> Option<usize> {
    row.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &x)| match best {
            Some((_, b)) if x <= b => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64) as f32
}

/// Margin and mixing weights for training
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TripletConfig {
    pub margin: f32,
    pub triplet_weight: f32,
    pub ce_weight: f32,
    /// Seed for random triplet sampling
    pub seed: u64,
}

impl Default for TripletConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            triplet_weight: DEFAULT_TRIPLET_WEIGHT,
            ce_weight: DEFAULT_CE_WEIGHT,
            seed: DEFAULT_SEED,
        }
    }
}

impl TripletConfig {
    pub fn validate(&self) -> Result<()> {
        check_margin(self.margin)?;
        for (name, weight) in [
            ("triplet_weight", self.triplet_weight),
            ("ce_weight", self.ce_weight),
        ] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be non-negative, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Training objective bound to a [`TripletConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TripletObjective {
    config: TripletConfig,
}

impl TripletObjective {
    pub fn new(config: TripletConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TripletConfig {
        &self.config
    }

    pub fn triplet_loss(
        &self,
        anchor: &[Vector],
        positive: &[Vector],
        negative: &[Vector],
    ) -> Result<f32> {
        triplet_loss(anchor, positive, negative, self.config.margin)
    }

    pub fn combined_loss(
        &self,
        anchor: &[Vector],
        positive: &[Vector],
        negative: &[Vector],
        logits: &[Vec<f32>],
        labels: &[usize],
    ) -> Result<f32> {
        combined_loss(
            anchor,
            positive,
            negative,
            logits,
            labels,
            self.config.margin,
            self.config.triplet_weight,
            self.config.ce_weight,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(data: &[f32]) -> Vector {
        Vector::from_slice(data)
    }

    #[test]
    fn test_separated_triplet_has_zero_loss() {
        // d_pos = 0.01, d_neg = 4.0
        let loss = triplet_loss(
            &[v(&[1.0, 0.0])],
            &[v(&[0.9, 0.0])],
            &[v(&[-1.0, 0.0])],
            0.3,
        )
        .unwrap();
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_margin_boundary_is_zero() {
        // d_pos = 0, d_neg = 1 = margin
        let loss = triplet_loss(&[v(&[0.0])], &[v(&[0.0])], &[v(&[1.0])], 1.0).unwrap();
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_violating_triplet() {
        // d_pos = 2, d_neg = 0 -> 2 + 0.3
        let loss = triplet_loss(
            &[v(&[1.0, 0.0])],
            &[v(&[0.0, 1.0])],
            &[v(&[1.0, 0.0])],
            0.3,
        )
        .unwrap();
        assert!((loss - 2.3).abs() < 1e-6);
    }

    #[test]
    fn test_batch_mean() {
        let anchor = [v(&[1.0, 0.0]), v(&[1.0, 0.0])];
        let positive = [v(&[1.0, 0.0]), v(&[0.0, 1.0])];
        let negative = [v(&[-1.0, 0.0]), v(&[1.0, 0.0])];
        let losses = triplet_losses(&anchor, &positive, &negative, 0.3).unwrap();
        assert_eq!(losses[0], 0.0);
        assert!((losses[1] - 2.3).abs() < 1e-6);
        let loss = triplet_loss(&anchor, &positive, &negative, 0.3).unwrap();
        assert!((loss - 1.15).abs() < 1e-6);
    }

    #[test]
    fn test_triplet_shape_errors() {
        let err = triplet_loss(&[v(&[1.0])], &[], &[v(&[1.0])], 0.3).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "positive batch", .. }));

        let err = triplet_loss(&[v(&[1.0])], &[v(&[1.0, 2.0])], &[v(&[1.0])], 0.3).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));

        assert!(triplet_loss(&[], &[], &[], 0.0).is_err());
        assert_eq!(triplet_loss(&[], &[], &[], 0.3).unwrap(), 0.0);
    }

    #[test]
    fn test_triplet_rows_must_share_dimension() {
        // each row is self-consistent, but the second row is 3-d
        let anchor = [v(&[1.0, 0.0]), v(&[1.0, 0.0, 0.0])];
        let positive = [v(&[1.0, 0.0]), v(&[1.0, 0.0, 0.0])];
        let negative = [v(&[-1.0, 0.0]), v(&[-1.0, 0.0, 0.0])];
        let err = triplet_loss(&anchor, &positive, &negative, 0.3).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_cross_entropy_uniform() {
        let loss = cross_entropy(&[vec![0.0, 0.0, 0.0, 0.0]], &[2]).unwrap();
        assert!((loss - 4.0f32.ln()).abs() < 1e-6);
    }

    #[test]
    fn test_cross_entropy_is_stable_for_large_logits() {
        let loss = cross_entropy(&[vec![1000.0, 0.0]], &[0]).unwrap();
        assert!(loss.is_finite());
        assert!(loss.abs() < 1e-6);
    }

    #[test]
    fn test_cross_entropy_label_out_of_range() {
        let err = cross_entropy(&[vec![0.0, 1.0]], &[2]).unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { label: 2, num_classes: 2 }));
    }

    #[test]
    fn test_combined_loss_weights() {
        let anchor = [v(&[1.0, 0.0])];
        let positive = [v(&[0.0, 1.0])];
        let negative = [v(&[1.0, 0.0])];
        let logits = [vec![0.0, 0.0]];
        let labels = [1];

        let loss =
            combined_loss(&anchor, &positive, &negative, &logits, &labels, 0.3, 1.0, 0.5).unwrap();
        let expected = 2.3 + 0.5 * 2.0f32.ln();
        assert!((loss - expected).abs() < 1e-5);
    }

    #[test]
    fn test_combined_loss_batch_mismatch() {
        let anchor = [v(&[1.0]), v(&[0.5])];
        let err = combined_loss(
            &anchor,
            &anchor,
            &anchor,
            &[vec![0.0, 1.0]],
            &[0, 1],
            0.3,
            1.0,
            0.5,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { what: "logits batch", .. }));
    }

    #[test]
    fn test_accuracy() {
        let logits = [vec![0.1, 0.9], vec![0.8, 0.2], vec![0.3, 0.7]];
        let acc = classification_accuracy(&logits, &[1, 0, 0]).unwrap();
        assert!((acc - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(classification_accuracy(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_objective_uses_config() {
        let objective = TripletObjective::new(TripletConfig {
            margin: 1.0,
            ..Default::default()
        })
        .unwrap();
        let loss = objective
            .triplet_loss(&[v(&[0.0])], &[v(&[0.0])], &[v(&[0.5])])
            .unwrap();
        assert!((loss - 0.75).abs() < 1e-6);

        assert!(TripletObjective::new(TripletConfig {
            ce_weight: -1.0,
            ..Default::default()
        })
        .is_err());
    }
}
