//! # veriface Core
//!
//! Core library for the veriface face verification engine.
//!
//! This crate provides the embedding contract and the live decision path:
//!
//! - [`Vector`] - Fixed-length face embedding with SIMD dot/distance kernels
//! - [`Verifier`] - Cosine scoring and threshold decisions
//! - [`ThresholdPolicy`] - Validated acceptance threshold with named presets
//! - [`TierTable`] - Ordered `(lower_bound, label)` confidence tiers
//! - [`ModelMetadata`] - Checkpoint metadata used to validate embedding length
//!
//! ## Example
//!
//! ```rust
//! use veriface_core::{Vector, Verifier, VerificationConfig};
//!
//! let verifier = Verifier::new(VerificationConfig::default()).unwrap();
//!
//! let probe = Vector::new(vec![0.9, 0.1, 0.4]);
//! let reference = Vector::new(vec![0.8, 0.2, 0.4]);
//! let verdict = verifier.verify(&probe, &reference).unwrap();
//!
//! assert!(verdict.is_match);
//! println!("{:.4} -> {}", verdict.score, verdict.tier.label);
//! ```

pub mod error;
pub mod metadata;
pub mod policy;
pub mod tier;
pub mod vector;
pub mod verify;

/// SIMD-optimized embedding kernels
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
/// - Scalar fallback everywhere else
pub mod simd;

pub use error::{Error, Result};
pub use metadata::{ModelMetadata, DEFAULT_EMBEDDING_DIM};
pub use policy::{
    SecurityMode, ThresholdPolicy, ThresholdPresets, DEFAULT_STANDARD_THRESHOLD,
    DEFAULT_STRICT_THRESHOLD,
};
pub use tier::{ConfidenceTier, TierTable};
pub use vector::{normalize, Vector};
pub use verify::{
    confidence_tier, cosine_similarity, decide, score_pairs, similarity, Decision, Verdict,
    VerificationConfig, VerificationPair, Verifier, DEFAULT_SIMILARITY_EPSILON,
};
