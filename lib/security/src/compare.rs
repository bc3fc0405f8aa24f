//! Side-by-side FAR/FRR for candidate thresholds

use crate::rates::ErrorRates;
use crate::scores::LabeledScores;
use serde::{Deserialize, Serialize};
use veriface_core::{Result, ThresholdPolicy};

/// Tolerance when matching a candidate threshold against a named preset
pub const PRESET_MATCH_TOLERANCE: f32 = 1e-6;

/// A named operating point shown next to the comparison table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdLabel {
    pub threshold: f32,
    pub label: String,
}

impl ThresholdLabel {
    pub fn new(threshold: f32, label: impl Into<String>) -> Self {
        Self {
            threshold,
            label: label.into(),
        }
    }
}

pub fn default_threshold_labels() -> Vec<ThresholdLabel> {
    vec![
        ThresholdLabel::new(0.5, "very permissive (insecure)"),
        ThresholdLabel::new(0.65, "permissive"),
        ThresholdLabel::new(0.75, "high security (recommended)"),
        ThresholdLabel::new(0.85, "ultra secure"),
    ]
}

/// One row of the comparison table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdRow {
    pub threshold: f32,
    pub rates: ErrorRates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl LabeledScores {
    /// FAR/FRR per candidate, in input order
    pub fn compare_thresholds(
        &self,
        thresholds: &[f32],
        labels: &[ThresholdLabel],
    ) -> Result<Vec<ThresholdRow>> {
        thresholds
            .iter()
            .map(|&threshold| {
                let policy = ThresholdPolicy::new(threshold)?;
                let recommendation = labels
                    .iter()
                    .find(|l| (l.threshold - threshold).abs() <= PRESET_MATCH_TOLERANCE)
                    .map(|l| l.label.clone());
                Ok(ThresholdRow {
                    threshold,
                    rates: self.far_frr(policy.threshold()),
                    recommendation,
                })
            })
            .collect()
    }
}

/// Compare candidate thresholds using the default preset labels
pub fn compare_thresholds(
    scores: &[f32],
    labels: &[bool],
    thresholds: &[f32],
) -> Result<Vec<ThresholdRow>> {
    LabeledScores::new(scores, labels)?.compare_thresholds(thresholds, &default_threshold_labels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriface_core::Error;

    #[test]
    fn test_rows_follow_input_order() {
        let scores = [0.9, 0.7, 0.6, 0.4];
        let labels = [true, true, false, false];
        let rows = compare_thresholds(&scores, &labels, &[0.85, 0.5, 0.65]).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].threshold, 0.85);
        assert_eq!(rows[0].rates.far, 0.0);
        assert_eq!(rows[0].rates.frr, 0.5);
        assert_eq!(rows[1].rates.far, 0.5);
        assert_eq!(rows[1].rates.frr, 0.0);
        assert_eq!(rows[2].rates.far, 0.0);
        assert_eq!(rows[2].rates.frr, 0.0);
    }

    #[test]
    fn test_recommendation_labels() {
        let rows = compare_thresholds(&[0.8], &[true], &[0.75, 0.7]).unwrap();
        assert_eq!(
            rows[0].recommendation.as_deref(),
            Some("high security (recommended)")
        );
        assert_eq!(rows[1].recommendation, None);
    }

    #[test]
    fn test_invalid_candidate() {
        let err = compare_thresholds(&[0.8], &[true], &[0.5, 2.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidThreshold(_)));
    }
}
