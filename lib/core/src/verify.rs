use crate::simd::{dot_product_simd, norm_simd};
use crate::{
    ConfidenceTier, Error, Result, SecurityMode, ThresholdPolicy, ThresholdPresets, TierTable,
    Vector,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Denominator guard for cosine similarity
pub const DEFAULT_SIMILARITY_EPSILON: f32 = 1e-8;

/// Cosine similarity `a·b / (||a||·||b|| + eps)`.
///
/// A zero vector scores 0.0 instead of dividing by zero. Each side is first
/// rescaled by its largest component when that component is very large or
/// very small, so the reductions stay finite for any finite input.
#[inline]
pub fn cosine_similarity(a: &Vector, b: &Vector, eps: f32) -> Result<f32> {
    a.check_same_dim(b)?;
    let a = a.well_scaled();
    let b = b.well_scaled();
    let dot = dot_product_simd(&a, &b);
    Ok(dot / (norm_simd(&a) * norm_simd(&b) + eps))
}

/// Cosine similarity with the default epsilon guard
#[inline]
pub fn similarity(a: &Vector, b: &Vector) -> Result<f32> {
    cosine_similarity(a, b, DEFAULT_SIMILARITY_EPSILON)
}

/// Outcome of a threshold decision
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Decision {
    pub is_match: bool,
    pub score: f32,
}

/// Same/different decision at threshold `threshold`
pub fn decide(a: &Vector, b: &Vector, threshold: f32) -> Result<Decision> {
    let score = similarity(a, b)?;
    Ok(Decision {
        is_match: score >= threshold,
        score,
    })
}

/// Tier for a score under the default four-tier table
pub fn confidence_tier(score: f32) -> ConfidenceTier {
    TierTable::default().classify(score).clone()
}

/// Configuration for a [`Verifier`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VerificationConfig {
    pub presets: ThresholdPresets,
    pub mode: SecurityMode,
    pub tiers: TierTable,
    pub similarity_epsilon: f32,
    /// Expected embedding length; unchecked when `None`
    pub embedding_dim: Option<usize>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            presets: ThresholdPresets::default(),
            mode: SecurityMode::Standard,
            tiers: TierTable::default(),
            similarity_epsilon: DEFAULT_SIMILARITY_EPSILON,
            embedding_dim: None,
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.similarity_epsilon.is_finite() && self.similarity_epsilon > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "similarity_epsilon must be positive, got {}",
                self.similarity_epsilon
            )));
        }
        if self.embedding_dim == Some(0) {
            return Err(Error::InvalidConfig(
                "embedding_dim must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full verdict for one pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Verdict {
    pub is_match: bool,
    pub score: f32,
    pub threshold: f32,
    pub tier: ConfidenceTier,
}

/// Two embeddings to compare, with an optional ground-truth label.
///
/// The label is only read by evaluation, never by live decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationPair {
    pub probe: Vector,
    pub reference: Vector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_identity: Option<bool>,
}

impl VerificationPair {
    pub fn new(probe: Vector, reference: Vector) -> Self {
        Self {
            probe,
            reference,
            same_identity: None,
        }
    }

    pub fn labeled(probe: Vector, reference: Vector, same_identity: bool) -> Self {
        Self {
            probe,
            reference,
            same_identity: Some(same_identity),
        }
    }
}

/// Verification protocol bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerificationConfig,
    policy: ThresholdPolicy,
}

impl Verifier {
    pub fn new(config: VerificationConfig) -> Result<Self> {
        config.validate()?;
        let policy = config.presets.policy(config.mode);
        Ok(Self { config, policy })
    }

    /// Override the preset with an explicit threshold
    pub fn with_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    fn check_dim(&self, v: &Vector) -> Result<()> {
        match self.config.embedding_dim {
            Some(expected) if v.dim() != expected => Err(Error::DimensionMismatch {
                expected,
                actual: v.dim(),
            }),
            _ => Ok(()),
        }
    }

    pub fn similarity(&self, a: &Vector, b: &Vector) -> Result<f32> {
        self.check_dim(a)?;
        self.check_dim(b)?;
        cosine_similarity(a, b, self.config.similarity_epsilon)
    }

    pub fn decide(&self, a: &Vector, b: &Vector) -> Result<Decision> {
        let score = self.similarity(a, b)?;
        Ok(Decision {
            is_match: self.policy.accepts(score),
            score,
        })
    }

    pub fn confidence_tier(&self, score: f32) -> &ConfidenceTier {
        self.config.tiers.classify(score)
    }

    /// Decision plus tier for one pair
    pub fn verify(&self, a: &Vector, b: &Vector) -> Result<Verdict> {
        let Decision { is_match, score } = self.decide(a, b)?;
        Ok(Verdict {
            is_match,
            score,
            threshold: self.policy.threshold(),
            tier: self.confidence_tier(score).clone(),
        })
    }

    /// Score many pairs in parallel; output order matches input order
    pub fn score_pairs(&self, pairs: &[VerificationPair]) -> Result<Vec<f32>> {
        pairs
            .par_iter()
            .map(|pair| self.similarity(&pair.probe, &pair.reference))
            .collect()
    }
}

/// Score many pairs in parallel with the default epsilon guard
pub fn score_pairs(pairs: &[VerificationPair]) -> Result<Vec<f32>> {
    Verifier::default().score_pairs(pairs)
}
