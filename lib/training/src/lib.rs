//! # veriface Training
//!
//! The discriminative objective that shapes face embeddings for verification.
//!
//! - [`triplet_loss`] - Margin-based triplet loss on squared Euclidean distances
//! - [`cross_entropy`] / [`combined_loss`] - Classification signal mixed with the triplet term
//! - [`TripletSampler`] - Pluggable triplet mining ([`RandomSampler`], [`HardNegativeSampler`])
//! - [`GradientBackend`] / [`Optimizer`] - Backend-agnostic optimizer steps
//!
//! The triplet margin and the verification threshold describe the same
//! geometry: a trained model places same-identity pairs closer than
//! different-identity pairs by at least the margin, which is what lets a single
//! cosine threshold separate them.
//!
//! ## Example
//!
//! ```rust
//! use veriface_core::Vector;
//! use veriface_training::{HardNegativeSampler, IdentitySet, TripletObjective, TripletSampler};
//!
//! let set = IdentitySet::new(
//!     vec![
//!         Vector::new(vec![1.0, 0.0]),
//!         Vector::new(vec![0.9, 0.1]),
//!         Vector::new(vec![0.0, 1.0]),
//!         Vector::new(vec![0.1, 0.9]),
//!     ],
//!     vec![0, 0, 1, 1],
//! )
//! .unwrap();
//!
//! let triplets = HardNegativeSampler::hard().sample_triplets(&set);
//! let batch = set.gather(&triplets).unwrap();
//!
//! let objective = TripletObjective::default();
//! let loss = objective
//!     .triplet_loss(&batch.anchor, &batch.positive, &batch.negative)
//!     .unwrap();
//! assert!(loss >= 0.0);
//! ```

pub mod loss;
pub mod mining;
pub mod optim;

pub use loss::{
    classification_accuracy, combined_loss, cross_entropy, triplet_loss, triplet_losses,
    TripletConfig, TripletObjective, DEFAULT_CE_WEIGHT, DEFAULT_MARGIN, DEFAULT_SEED,
    DEFAULT_TRIPLET_WEIGHT,
};
pub use mining::{
    HardNegativeSampler, IdentitySet, RandomSampler, Triplet, TripletBatch, TripletSampler,
};
pub use optim::{train_step, FiniteDifference, GradientBackend, Optimizer, ParameterSet, Sgd};
