//! Coverage calculation
//!
//! Coverage summarizes, as a single scalar in [0, 1], how well a set of
//! retrieved chunks supports a query. It rewards both the strongest match
//! and the breadth of support:
//!
//! ```text
//! coverage = clamp(top_weight * max(s) + mean_weight * mean(s), 0, 1)
//! ```
//!
//! where each similarity `s` is first clamped into [0, 1] (negative cosine
//! similarity carries no support).
//!
//! Properties relied on by the gates:
//! - an empty score list has coverage 0
//! - appending a score higher than the current maximum never lowers coverage
//!   (both the max and the mean can only grow)
//! - the result is always within [0, 1]

use serde::{Deserialize, Serialize};

/// Weights of the coverage formula. Tunable policy, not fixed constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageWeights {
    /// Weight of the best similarity
    pub top_weight: f64,
    /// Weight of the mean similarity
    pub mean_weight: f64,
}

impl CoverageWeights {
    pub fn new(top_weight: f64, mean_weight: f64) -> Self {
        Self {
            top_weight,
            mean_weight,
        }
    }

    /// Weights must be finite, non-negative, and not both zero.
    pub fn is_valid(&self) -> bool {
        let finite = self.top_weight.is_finite() && self.mean_weight.is_finite();
        finite
            && self.top_weight >= 0.0
            && self.mean_weight >= 0.0
            && self.top_weight + self.mean_weight > 0.0
    }
}

impl Default for CoverageWeights {
    fn default() -> Self {
        Self {
            top_weight: 0.6,
            mean_weight: 0.4,
        }
    }
}

/// Compute coverage for a sequence of similarity scores.
///
/// # Example
///
/// ```
/// use review_domain::retrieval::{coverage, CoverageWeights};
///
/// let weights = CoverageWeights::default();
/// assert_eq!(coverage(&[], &weights), 0.0);
///
/// // 0.6 * 0.9 + 0.4 * 0.8
/// let c = coverage(&[0.9, 0.7], &weights);
/// assert!((c - 0.86).abs() < 1e-9);
/// ```
pub fn coverage(scores: &[f64], weights: &CoverageWeights) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let normalized = scores.iter().map(|s| normalize(*s));
    let (max, sum) = normalized.fold((0.0_f64, 0.0_f64), |(max, sum), s| {
        (max.max(s), sum + s)
    });
    let mean = sum / scores.len() as f64;

    let top_weight = weights.top_weight.max(0.0);
    let mean_weight = weights.mean_weight.max(0.0);

    let value = top_weight * max + mean_weight * mean;
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Map a raw similarity into [0, 1]; NaN counts as no support.
fn normalize(similarity: f64) -> f64 {
    if similarity.is_nan() {
        0.0
    } else {
        similarity.clamp(0.0, 1.0)
    }
}
