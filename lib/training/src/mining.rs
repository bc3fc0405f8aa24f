//! Triplet mining
//!
//! Which `(anchor, positive, negative)` triples the loss sees is a policy
//! separate from the loss itself. Random triplets are cheap but mostly already
//! satisfy the margin; hard-negative mining picks the impostor closest to each
//! anchor so the margin keeps getting pressure.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use veriface_core::simd::squared_l2_simd;
use veriface_core::{Error, Result, Vector};

/// Indices into an [`IdentitySet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triplet {
    pub anchor: usize,
    pub positive: usize,
    pub negative: usize,
}

/// Materialized triplet batches, ready for the loss functions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripletBatch {
    pub anchor: Vec<Vector>,
    pub positive: Vec<Vector>,
    pub negative: Vec<Vector>,
    /// Identity of each anchor, usable as a class label
    pub labels: Vec<usize>,
}

impl TripletBatch {
    pub fn len(&self) -> usize {
        self.anchor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchor.is_empty()
    }
}

/// Embeddings labeled with identities
#[derive(Debug, Clone)]
pub struct IdentitySet {
    embeddings: Vec<Vector>,
    identities: Vec<usize>,
    /// identity -> sample indices, ascending
    groups: HashMap<usize, Vec<usize>>,
}

impl IdentitySet {
    /// Fails when the two lists differ in length or embeddings differ in dimension
    pub fn new(embeddings: Vec<Vector>, identities: Vec<usize>) -> Result<Self> {
        if embeddings.len() != identities.len() {
            return Err(Error::ShapeMismatch {
                what: "identities",
                expected: embeddings.len(),
                actual: identities.len(),
            });
        }
        if let Some(first) = embeddings.first() {
            for v in &embeddings[1..] {
                first.check_same_dim(v)?;
            }
        }

        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for (index, &identity) in identities.iter().enumerate() {
            groups.entry(identity).or_default().push(index);
        }

        Ok(Self {
            embeddings,
            identities,
            groups,
        })
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn embedding(&self, index: usize) -> &Vector {
        &self.embeddings[index]
    }

    pub fn identity(&self, index: usize) -> usize {
        self.identities[index]
    }

    pub fn num_identities(&self) -> usize {
        self.groups.len()
    }

    /// Other samples sharing `index`'s identity
    fn positives(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.groups[&self.identities[index]]
            .iter()
            .copied()
            .filter(move |&j| j != index)
    }

    /// Whether `index` can anchor a triplet at all
    fn can_anchor(&self, index: usize) -> bool {
        self.groups[&self.identities[index]].len() >= 2 && self.groups.len() >= 2
    }

    fn distance(&self, a: usize, b: usize) -> f32 {
        squared_l2_simd(self.embeddings[a].as_slice(), self.embeddings[b].as_slice())
    }

    /// Copy the referenced embeddings into loss-ready batches
    pub fn gather(&self, triplets: &[Triplet]) -> Result<TripletBatch> {
        let mut batch = TripletBatch::default();
        for t in triplets {
            for index in [t.anchor, t.positive, t.negative] {
                if index >= self.len() {
                    return Err(Error::ShapeMismatch {
                        what: "triplet index",
                        expected: self.len(),
                        actual: index,
                    });
                }
            }
            batch.anchor.push(self.embeddings[t.anchor].clone());
            batch.positive.push(self.embeddings[t.positive].clone());
            batch.negative.push(self.embeddings[t.negative].clone());
            batch.labels.push(self.identities[t.anchor]);
        }
        Ok(batch)
    }
}

/// Triplet selection policy
pub trait TripletSampler {
    /// At most one triplet per anchor, in anchor order. Anchors without a
    /// second sample of their identity, or without any other identity, are
    /// skipped.
    fn sample_triplets(&mut self, set: &IdentitySet) -> Vec<Triplet>;
}

/// Uniformly random positive and negative per anchor
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TripletSampler for RandomSampler {
    fn sample_triplets(&mut self, set: &IdentitySet) -> Vec<Triplet> {
        let mut triplets = Vec::new();
        for anchor in 0..set.len() {
            if !set.can_anchor(anchor) {
                continue;
            }
            let group = &set.groups[&set.identity(anchor)];
            // every group member except the anchor itself
            let mut pick = self.rng.random_range(0..group.len() - 1);
            if group[pick] == anchor {
                pick = group.len() - 1;
            }
            let positive = group[pick];

            // another identity exists, so rejection terminates
            let negative = loop {
                let candidate = self.rng.random_range(0..set.len());
                if set.identity(candidate) != set.identity(anchor) {
                    break candidate;
                }
            };

            triplets.push(Triplet {
                anchor,
                positive,
                negative,
            });
        }
        debug!(sampled = triplets.len(), samples = set.len(), "random triplets sampled");
        triplets
    }
}

/// Closest-impostor mining.
///
/// The positive is the farthest sample of the anchor's identity. In hard mode
/// the negative is the closest sample of any other identity. In semi-hard mode
/// it is the closest negative still farther than the positive, falling back to
/// the hardest negative when none is.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardNegativeSampler {
    pub semi_hard: bool,
}

impl HardNegativeSampler {
    pub fn hard() -> Self {
        Self { semi_hard: false }
    }

    pub fn semi_hard() -> Self {
        Self { semi_hard: true }
    }
}

impl TripletSampler for HardNegativeSampler {
    fn sample_triplets(&mut self, set: &IdentitySet) -> Vec<Triplet> {
        let mut triplets = Vec::new();
        for anchor in 0..set.len() {
            if !set.can_anchor(anchor) {
                continue;
            }

            let Some((positive, d_pos)) = set
                .positives(anchor)
                .map(|j| (j, set.distance(anchor, j)))
                .fold(None, |best: Option<(usize, f32)>, (j, d)| match best {
                    Some((_, bd)) if d <= bd => best,
                    _ => Some((j, d)),
                })
            else {
                continue;
            };

            let mut hardest: Option<(usize, f32)> = None;
            let mut semi: Option<(usize, f32)> = None;
            for j in 0..set.len() {
                if set.identity(j) == set.identity(anchor) {
                    continue;
                }
                let d = set.distance(anchor, j);
                if hardest.map_or(true, |(_, bd)| d < bd) {
                    hardest = Some((j, d));
                }
                if d > d_pos && semi.map_or(true, |(_, bd)| d < bd) {
                    semi = Some((j, d));
                }
            }

            let chosen = if self.semi_hard { semi.or(hardest) } else { hardest };
            if let Some((negative, _)) = chosen {
                triplets.push(Triplet {
                    anchor,
                    positive,
                    negative,
                });
            }
        }
        debug!(
            sampled = triplets.len(),
            semi_hard = self.semi_hard,
            "hard-negative triplets mined"
        );
        triplets
    }
}
