//! Aggregated settings for every component, loadable from one JSON file.
//!
//! Every section is optional; missing fields take their documented defaults.
//!
//! ```json
//! {
//!   "verification": { "mode": "strict", "embedding_dim": 128 },
//!   "evaluation": { "grid_points": 200 },
//!   "training": { "margin": 0.3, "triplet_weight": 1.0, "ce_weight": 0.5 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use veriface_core::{Result, VerificationConfig};
use veriface_security::EvaluationConfig;
use veriface_training::TripletConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub verification: VerificationConfig,
    pub evaluation: EvaluationConfig,
    pub training: TripletConfig,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.verification.validate()?;
        self.evaluation.validate()?;
        self.training.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use veriface_core::{Error, SecurityMode};

    #[test]
    fn test_empty_object_is_default() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.evaluation.grid_points, 100);
        assert_eq!(settings.training.margin, 0.3);
        assert_eq!(settings.verification.presets.standard.threshold(), 0.75);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "verification": { "mode": "strict", "presets": { "strict": 0.9 } },
            "evaluation": { "grid_points": 201 }
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.verification.mode, SecurityMode::Strict);
        assert_eq!(settings.verification.presets.strict.threshold(), 0.9);
        assert_eq!(settings.verification.presets.standard.threshold(), 0.75);
        assert_eq!(settings.evaluation.grid_points, 201);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Settings::from_json_str(r#"{"training": {"margin": -1.0}}"#).is_err());
        assert!(Settings::from_json_str(r#"{"evaluation": {"grid_points": 0}}"#).is_err());
        assert!(matches!(
            Settings::from_json_str(r#"{"verification": {"presets": {"standard": 3.0}}}"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"training": {{"seed": 7}}}}"#).unwrap();
        let settings = Settings::from_json_file(file.path()).unwrap();
        assert_eq!(settings.training.seed, 7);
    }
}
