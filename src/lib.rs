//! # veriface
//!
//! A face verification decision engine over fixed-length embeddings.
//!
//! veriface takes embeddings from an upstream feature extractor and
//! (a) decides whether two of them depict the same identity, with a tiered
//! confidence label, and (b) evaluates how well a threshold trades false
//! acceptance against false rejection over labeled pairs.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! veriface verify pair.json --strict
//! veriface report scores.json --threshold 0.75
//! veriface compare scores.json --thresholds 0.5,0.65,0.75,0.85
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use veriface::prelude::*;
//!
//! let verifier = Verifier::new(VerificationConfig::default()).unwrap();
//! let verdict = verifier
//!     .verify(&Vector::new(vec![0.6, 0.8]), &Vector::new(vec![0.6, 0.8]))
//!     .unwrap();
//! assert!(verdict.is_match);
//!
//! let report = veriface::security::report(&[0.9, 0.2], &[true, false], 0.75).unwrap();
//! assert_eq!(report.rates.far, 0.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`veriface-core`](veriface_core) - Embedding contract, SIMD kernels, verification protocol, confidence tiers
//! - [`veriface-security`](veriface_security) - Distribution stats, FAR/FRR, EER, threshold comparison
//! - [`veriface-training`](veriface_training) - Triplet margin objective, mining, optimizer steps

pub mod config;
pub mod input;
pub mod render;

pub use config::Settings;

// Re-export core types
pub use veriface_core::{
    confidence_tier, decide, normalize, similarity, ConfidenceTier, Decision, Error,
    ModelMetadata, Result, SecurityMode, ThresholdPolicy, ThresholdPresets, TierTable, Vector,
    Verdict, VerificationConfig, VerificationPair, Verifier,
};

/// Security evaluation engine
pub mod security {
    pub use veriface_security::*;
}

/// Training objectives
pub mod training {
    pub use veriface_training::*;
}

/// SIMD-optimized embedding kernels
pub mod simd {
    pub use veriface_core::simd::{dot_product_simd, norm_simd, squared_l2_simd};
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConfidenceTier, Decision, Error, Result, SecurityMode, Settings, ThresholdPolicy,
        TierTable, Vector, Verdict, VerificationConfig, VerificationPair, Verifier,
    };
    pub use veriface_security::{EvaluationConfig, Evaluator, SecurityReport};
    pub use veriface_training::{TripletConfig, TripletObjective, TripletSampler};
}
