use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Standard-security acceptance threshold
pub const DEFAULT_STANDARD_THRESHOLD: f32 = 0.75;

/// Ultra-security acceptance threshold
pub const DEFAULT_STRICT_THRESHOLD: f32 = 0.85;

/// Cosine threshold τ: a score `>= τ` means "same identity".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "f32", into = "f32")]
pub struct ThresholdPolicy {
    threshold: f32,
}

impl ThresholdPolicy {
    /// Validate τ ∈ [0, 1]
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    #[inline]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    #[inline]
    pub fn accepts(&self, score: f32) -> bool {
        score >= self.threshold
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STANDARD_THRESHOLD,
        }
    }
}

impl TryFrom<f32> for ThresholdPolicy {
    type Error = Error;

    fn try_from(threshold: f32) -> Result<Self> {
        Self::new(threshold)
    }
}

impl From<ThresholdPolicy> for f32 {
    fn from(policy: ThresholdPolicy) -> Self {
        policy.threshold
    }
}

/// Named threshold presets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThresholdPresets {
    pub standard: ThresholdPolicy,
    pub strict: ThresholdPolicy,
}

impl Default for ThresholdPresets {
    fn default() -> Self {
        Self {
            standard: ThresholdPolicy {
                threshold: DEFAULT_STANDARD_THRESHOLD,
            },
            strict: ThresholdPolicy {
                threshold: DEFAULT_STRICT_THRESHOLD,
            },
        }
    }
}

/// Which preset a caller wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    #[default]
    Standard,
    Strict,
}

impl ThresholdPresets {
    pub fn policy(&self, mode: SecurityMode) -> ThresholdPolicy {
        match mode {
            SecurityMode::Standard => self.standard,
            SecurityMode::Strict => self.strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(ThresholdPolicy::new(0.0).is_ok());
        assert!(ThresholdPolicy::new(1.0).is_ok());
        assert!(matches!(ThresholdPolicy::new(1.2), Err(Error::InvalidThreshold(_))));
        assert!(ThresholdPolicy::new(-0.1).is_err());
        assert!(ThresholdPolicy::new(f32::NAN).is_err());
    }

    #[test]
    fn test_accepts_is_inclusive() {
        let policy = ThresholdPolicy::new(0.75).unwrap();
        assert!(policy.accepts(0.75));
        assert!(!policy.accepts(0.7499));
    }

    #[test]
    fn test_presets() {
        let presets = ThresholdPresets::default();
        assert_eq!(presets.policy(SecurityMode::Standard).threshold(), 0.75);
        assert_eq!(presets.policy(SecurityMode::Strict).threshold(), 0.85);
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<ThresholdPolicy>("0.6").is_ok());
        assert!(serde_json::from_str::<ThresholdPolicy>("1.5").is_err());
    }
}
