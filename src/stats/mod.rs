//! Summary statistics over retained timing samples.
//!
//! Mean, median, extremes and count per variant, plus the
//! baseline/accelerated speedup. The warmup discard is the only filtering.

use crate::model::VariantResult;
use serde::Serialize;
use std::cmp::Ordering;

/// Reduced view of one variant's samples, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl SummaryStatistics {
    /// Summarize raw samples (seconds). An empty slice yields all zeros.
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean: 0.0,
                median: 0.0,
                min: 0.0,
                max: 0.0,
                count: 0,
            };
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        Self {
            mean: mean(samples),
            median: median_of_sorted(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            count: samples.len(),
        }
    }
}

/// Summarize a variant's retained samples.
#[must_use]
pub fn summarize(result: &VariantResult) -> SummaryStatistics {
    SummaryStatistics::from_samples(&result.seconds())
}

/// Arithmetic mean; zero for an empty slice.
#[must_use]
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

/// Median; the two middle values are averaged for even counts.
#[must_use]
pub fn median(samples: &[f64]) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Baseline mean over accelerated mean.
///
/// Positive infinity when the accelerated mean is exactly zero.
#[must_use]
pub fn speedup(baseline: &SummaryStatistics, accelerated: &SummaryStatistics) -> f64 {
    if accelerated.mean == 0.0 {
        f64::INFINITY
    } else {
        baseline.mean / accelerated.mean
    }
}
