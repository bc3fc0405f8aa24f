use crate::compare::{default_threshold_labels, ThresholdLabel, ThresholdRow};
use crate::rates::{EqualErrorRate, ErrorRates, DEFAULT_GRID_POINTS};
use crate::report::{GradeBands, SecurityReport};
use crate::scores::LabeledScores;
use crate::stats::DistributionStats;
use serde::{Deserialize, Serialize};
use veriface_core::{Error, Result, ThresholdPolicy};

/// Configuration for an [`Evaluator`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Points in the EER sweep over [0, 1]
    pub grid_points: usize,
    /// Named operating points; their thresholds are the default comparison set
    pub threshold_labels: Vec<ThresholdLabel>,
    pub grades: GradeBands,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            threshold_labels: default_threshold_labels(),
            grades: GradeBands::default(),
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.grid_points < 2 {
            return Err(Error::InvalidConfig(format!(
                "grid_points must be at least 2, got {}",
                self.grid_points
            )));
        }
        for label in &self.threshold_labels {
            ThresholdPolicy::new(label.threshold)?;
        }
        self.grades.validate()
    }

    /// Thresholds compared when the caller names none
    pub fn default_thresholds(&self) -> Vec<f32> {
        self.threshold_labels.iter().map(|l| l.threshold).collect()
    }
}

/// Security evaluation engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn distribution_stats(&self, scores: &[f32], labels: &[bool]) -> Result<DistributionStats> {
        Ok(LabeledScores::new(scores, labels)?.stats())
    }

    pub fn far_frr(&self, scores: &[f32], labels: &[bool], threshold: f32) -> Result<ErrorRates> {
        let policy = ThresholdPolicy::new(threshold)?;
        Ok(LabeledScores::new(scores, labels)?.far_frr(policy.threshold()))
    }

    pub fn equal_error_rate(&self, scores: &[f32], labels: &[bool]) -> Result<EqualErrorRate> {
        LabeledScores::new(scores, labels)?.equal_error_rate(self.config.grid_points)
    }

    /// Compare `thresholds`, or the configured presets when empty
    pub fn compare_thresholds(
        &self,
        scores: &[f32],
        labels: &[bool],
        thresholds: &[f32],
    ) -> Result<Vec<ThresholdRow>> {
        let defaults;
        let thresholds: &[f32] = if thresholds.is_empty() {
            defaults = self.config.default_thresholds();
            &defaults
        } else {
            thresholds
        };
        LabeledScores::new(scores, labels)?
            .compare_thresholds(thresholds, &self.config.threshold_labels)
    }

    pub fn report(&self, scores: &[f32], labels: &[bool], threshold: f32) -> Result<SecurityReport> {
        let set = LabeledScores::new(scores, labels)?;
        self.report_for(&set, ThresholdPolicy::new(threshold)?)
    }

    /// Report over an already partitioned sample
    pub fn report_for(&self, set: &LabeledScores, policy: ThresholdPolicy) -> Result<SecurityReport> {
        let rates = set.far_frr(policy.threshold());
        Ok(SecurityReport {
            distribution: set.stats(),
            threshold: policy.threshold(),
            rates,
            eer: set.equal_error_rate(self.config.grid_points)?,
            assessment: self.config.grades.assess(rates),
        })
    }
}

/// Security report with the default evaluation settings
pub fn report(scores: &[f32], labels: &[bool], threshold: f32) -> Result<SecurityReport> {
    Evaluator::default().report(scores, labels, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FarGrade, FrrGrade};

    #[test]
    fn test_report_composes_metrics() {
        let scores = [0.95, 0.90, 0.10, 0.05];
        let labels = [true, true, false, false];
        let report = report(&scores, &labels, 0.5).unwrap();

        assert_eq!(report.threshold, 0.5);
        assert_eq!(report.rates.far, 0.0);
        assert_eq!(report.rates.frr, 0.0);
        assert_eq!(report.eer.eer, 0.0);
        assert_eq!(report.distribution.genuine.count, 2);
        assert_eq!(report.distribution.impostor.count, 2);
        assert_eq!(report.assessment.far, FarGrade::Excellent);
        assert_eq!(report.assessment.frr, FrrGrade::Excellent);
    }

    #[test]
    fn test_report_on_empty_input() {
        let report = report(&[], &[], 0.75).unwrap();
        assert_eq!(report.distribution, DistributionStats::default());
        assert_eq!(report.rates, ErrorRates::default());
    }

    #[test]
    fn test_empty_candidate_list_uses_presets() {
        let evaluator = Evaluator::default();
        let rows = evaluator
            .compare_thresholds(&[0.8, 0.3], &[true, false], &[])
            .unwrap();
        let thresholds: Vec<f32> = rows.iter().map(|r| r.threshold).collect();
        assert_eq!(thresholds, vec![0.5, 0.65, 0.75, 0.85]);
        assert!(rows.iter().all(|r| r.recommendation.is_some()));
    }

    #[test]
    fn test_coarse_grid() {
        let evaluator = Evaluator::new(EvaluationConfig {
            grid_points: 11,
            ..Default::default()
        })
        .unwrap();
        let eer = evaluator
            .equal_error_rate(&[0.9, 0.8, 0.4, 0.3], &[true, true, false, false])
            .unwrap();
        assert_eq!(eer.eer, 0.0);
        assert!((eer.threshold - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config() {
        let config = EvaluationConfig {
            grid_points: 1,
            ..Default::default()
        };
        assert!(Evaluator::new(config).is_err());

        let config = EvaluationConfig {
            threshold_labels: vec![ThresholdLabel::new(1.5, "bogus")],
            ..Default::default()
        };
        assert!(Evaluator::new(config).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = report(&[0.9, 0.2], &[true, false], 0.75).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["assessment"]["far"], "excellent");
        assert!(json["eer"]["threshold"].is_number());
    }
}
