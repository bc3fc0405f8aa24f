//! Labeled evaluation input read by the CLI.
//!
//! A file is a JSON array whose records either carry a precomputed score or a
//! pair of embeddings to be scored first:
//!
//! ```json
//! [
//!   { "score": 0.91, "same_identity": true },
//!   { "probe": [0.1, 0.2], "reference": [0.1, 0.3], "same_identity": false }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use veriface_core::{Vector, VerificationPair, Verifier};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabeledRecord {
    Score {
        score: f32,
        same_identity: bool,
    },
    Pair {
        probe: Vector,
        reference: Vector,
        same_identity: bool,
    },
}

/// Parallel score/label columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledSample {
    pub scores: Vec<f32>,
    pub labels: Vec<bool>,
}

impl LabeledSample {
    /// Resolve records into scores, scoring embedding pairs with `verifier`
    pub fn from_records(records: Vec<LabeledRecord>, verifier: &Verifier) -> Result<Self> {
        let mut scores = vec![0.0; records.len()];
        let mut labels = Vec::with_capacity(records.len());
        let mut pending = Vec::new();
        let mut pending_slots = Vec::new();

        for (slot, record) in records.into_iter().enumerate() {
            match record {
                LabeledRecord::Score {
                    score,
                    same_identity,
                } => {
                    scores[slot] = score;
                    labels.push(same_identity);
                }
                LabeledRecord::Pair {
                    probe,
                    reference,
                    same_identity,
                } => {
                    pending.push(VerificationPair::labeled(probe, reference, same_identity));
                    pending_slots.push(slot);
                    labels.push(same_identity);
                }
            }
        }

        let pair_scores = verifier
            .score_pairs(&pending)
            .context("failed to score embedding pairs")?;
        for (slot, score) in pending_slots.into_iter().zip(pair_scores) {
            scores[slot] = score;
        }

        Ok(Self { scores, labels })
    }

    pub fn from_json_file(path: &Path, verifier: &Verifier) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let records: Vec<LabeledRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse labeled scores in {}", path.display()))?;
        Self::from_records(records, verifier)
    }
}

/// Load a single `{ "probe": [...], "reference": [...] }` pair
pub fn load_pair(path: &Path) -> Result<VerificationPair> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse pair in {}", path.display()))
}
