//! Confidence tiers
//!
//! A tier is a presentation label derived from a similarity score alone. Tiers
//! live in an ordered table of `(lower_bound, label)` rows evaluated top-down,
//! so a deployment can add or retune rows without touching code.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One row of a [`TierTable`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceTier {
    /// Inclusive lower bound on the similarity score
    pub lower_bound: f32,
    /// Human-readable label
    pub label: String,
    /// Whether this tier represents an accepted match
    pub accepted: bool,
}

impl ConfidenceTier {
    pub fn new(lower_bound: f32, label: impl Into<String>, accepted: bool) -> Self {
        Self {
            lower_bound,
            label: label.into(),
            accepted,
        }
    }
}

/// Ordered tier table, highest lower bound first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Vec<ConfidenceTier>", into = "Vec<ConfidenceTier>")]
pub struct TierTable {
    tiers: Vec<ConfidenceTier>,
}

impl TierTable {
    /// Build a table from rows in any order.
    ///
    /// Rows are sorted by descending lower bound. Fails on an empty table or a
    /// non-finite bound.
    pub fn new(mut tiers: Vec<ConfidenceTier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(Error::InvalidConfig(
                "tier table needs at least one tier".to_string(),
            ));
        }
        if let Some(bad) = tiers.iter().find(|t| !t.lower_bound.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "tier '{}' has non-finite lower bound",
                bad.label
            )));
        }
        tiers.sort_by(|a, b| b.lower_bound.total_cmp(&a.lower_bound));
        Ok(Self { tiers })
    }

    /// Tier for a score: the first row whose lower bound the score reaches.
    ///
    /// Scores below every bound (or NaN) fall into the lowest tier.
    pub fn classify(&self, score: f32) -> &ConfidenceTier {
        self.tiers
            .iter()
            .find(|tier| score >= tier.lower_bound)
            .unwrap_or_else(|| &self.tiers[self.tiers.len() - 1])
    }

    pub fn tiers(&self) -> &[ConfidenceTier] {
        &self.tiers
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                ConfidenceTier::new(0.85, "ACCEPTED - high confidence", true),
                ConfidenceTier::new(0.75, "ACCEPTED - probable match", true),
                ConfidenceTier::new(0.5, "REJECTED - below security threshold", false),
                ConfidenceTier::new(-1.0, "REJECTED - definite non-match", false),
            ],
        }
    }
}

impl TryFrom<Vec<ConfidenceTier>> for TierTable {
    type Error = Error;

    fn try_from(tiers: Vec<ConfidenceTier>) -> Result<Self> {
        Self::new(tiers)
    }
}

impl From<TierTable> for Vec<ConfidenceTier> {
    fn from(table: TierTable) -> Self {
        table.tiers
    }
}
