//! Security report and grading

use crate::rates::{EqualErrorRate, ErrorRates};
use crate::stats::DistributionStats;
use serde::{Deserialize, Serialize};
use veriface_core::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarGrade {
    Excellent,
    Good,
    Moderate,
    Insecure,
}

impl FarGrade {
    pub fn description(&self) -> &'static str {
        match self {
            FarGrade::Excellent => "very few impostors accepted",
            FarGrade::Good => "acceptable for high security",
            FarGrade::Moderate => "consider raising the threshold",
            FarGrade::Insecure => "raise the threshold urgently",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrrGrade {
    Excellent,
    Acceptable,
    High,
}

impl FrrGrade {
    pub fn description(&self) -> &'static str {
        match self {
            FrrGrade::Excellent => "good experience for legitimate users",
            FrrGrade::Acceptable => "some legitimate users rejected",
            FrrGrade::High => "many legitimate users rejected",
        }
    }
}

/// Upper (exclusive) bounds of each grade band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GradeBands {
    pub far_excellent: f32,
    pub far_good: f32,
    pub far_moderate: f32,
    pub frr_excellent: f32,
    pub frr_acceptable: f32,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            far_excellent: 0.02,
            far_good: 0.05,
            far_moderate: 0.10,
            frr_excellent: 0.10,
            frr_acceptable: 0.20,
        }
    }
}

impl GradeBands {
    pub fn validate(&self) -> Result<()> {
        let far = [self.far_excellent, self.far_good, self.far_moderate];
        let frr = [self.frr_excellent, self.frr_acceptable];
        let in_range = far.iter().chain(&frr).all(|b| (0.0..=1.0).contains(b));
        let ascending = far.windows(2).all(|w| w[0] <= w[1]) && frr[0] <= frr[1];
        if !in_range || !ascending {
            return Err(Error::InvalidConfig(
                "grade bands must be ascending within [0, 1]".to_string(),
            ));
        }
        Ok(())
    }

    pub fn far_grade(&self, far: f32) -> FarGrade {
        if far < self.far_excellent {
            FarGrade::Excellent
        } else if far < self.far_good {
            FarGrade::Good
        } else if far < self.far_moderate {
            FarGrade::Moderate
        } else {
            FarGrade::Insecure
        }
    }

    pub fn frr_grade(&self, frr: f32) -> FrrGrade {
        if frr < self.frr_excellent {
            FrrGrade::Excellent
        } else if frr < self.frr_acceptable {
            FrrGrade::Acceptable
        } else {
            FrrGrade::High
        }
    }

    pub fn assess(&self, rates: ErrorRates) -> SecurityAssessment {
        SecurityAssessment {
            far: self.far_grade(rates.far),
            frr: self.frr_grade(rates.frr),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAssessment {
    pub far: FarGrade,
    pub frr: FrrGrade,
}

/// Everything known about decision quality at one threshold.
///
/// Built fresh from inputs on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityReport {
    pub distribution: DistributionStats,
    pub threshold: f32,
    pub rates: ErrorRates,
    pub eer: EqualErrorRate,
    pub assessment: SecurityAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_grades() {
        let bands = GradeBands::default();
        assert_eq!(bands.far_grade(0.0), FarGrade::Excellent);
        assert_eq!(bands.far_grade(0.02), FarGrade::Good);
        assert_eq!(bands.far_grade(0.07), FarGrade::Moderate);
        assert_eq!(bands.far_grade(0.10), FarGrade::Insecure);
    }

    #[test]
    fn test_frr_grades() {
        let bands = GradeBands::default();
        assert_eq!(bands.frr_grade(0.05), FrrGrade::Excellent);
        assert_eq!(bands.frr_grade(0.15), FrrGrade::Acceptable);
        assert_eq!(bands.frr_grade(0.5), FrrGrade::High);
    }

    #[test]
    fn test_band_validation() {
        assert!(GradeBands::default().validate().is_ok());
        let bands = GradeBands {
            far_good: 0.01,
            ..Default::default()
        };
        assert!(bands.validate().is_err());
    }
}
