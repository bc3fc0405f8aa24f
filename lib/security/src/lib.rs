//! # veriface Security
//!
//! Decision-quality evaluation over labeled similarity scores.
//!
//! Given `(score, same_identity)` samples this crate computes:
//!
//! - **Distribution statistics**: mean, population std, min, max and count for
//!   genuine and impostor pairs
//! - **FAR / FRR** at a threshold
//! - **EER**: the equal error rate found by a fixed-grid threshold sweep
//! - **Threshold comparison**: FAR/FRR side by side for candidate thresholds
//! - **Security report**: all of the above plus a graded assessment
//!
//! Empty or single-class samples are valid input and yield zero-valued
//! statistics rather than errors.
//!
//! ## Example
//!
//! ```rust
//! use veriface_security::{far_frr, equal_error_rate, report};
//!
//! let scores = [0.95, 0.90, 0.10, 0.05];
//! let labels = [true, true, false, false];
//!
//! let rates = far_frr(&scores, &labels, 0.5).unwrap();
//! assert_eq!((rates.far, rates.frr), (0.0, 0.0));
//!
//! let eer = equal_error_rate(&scores, &labels).unwrap();
//! assert_eq!(eer.eer, 0.0);
//!
//! let report = report(&scores, &labels, 0.75).unwrap();
//! assert_eq!(report.distribution.genuine.count, 2);
//! ```

pub mod compare;
pub mod evaluator;
pub mod rates;
pub mod report;
pub mod scores;
pub mod stats;

pub use compare::{compare_thresholds, default_threshold_labels, ThresholdLabel, ThresholdRow};
pub use evaluator::{report, EvaluationConfig, Evaluator};
pub use rates::{
    equal_error_rate, far_frr, threshold_grid, EqualErrorRate, ErrorRates, DEFAULT_GRID_POINTS,
};
pub use report::{FarGrade, FrrGrade, GradeBands, SecurityAssessment, SecurityReport};
pub use scores::LabeledScores;
pub use stats::{distribution_stats, DistributionStats, GroupStats};
