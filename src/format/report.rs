use crate::corpus::CorpusInfo;
use crate::model::{FeatureFlag, Variant, VariantResult};
use crate::stats::{SummaryStatistics, speedup, summarize};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// One variant's timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantSummary {
    pub label: String,
    pub flag: FeatureFlag,
    pub rustflags: String,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub runs: usize,
    pub samples_ms: Vec<f64>,
}

impl VariantSummary {
    #[must_use]
    pub fn from_statistics(
        result: &VariantResult,
        stats: &SummaryStatistics,
        rustflags: impl Into<String>,
    ) -> Self {
        Self {
            label: result.label().to_string(),
            flag: result.variant.flag,
            rustflags: rustflags.into(),
            mean_ms: stats.mean * 1000.0,
            median_ms: stats.median * 1000.0,
            min_ms: stats.min * 1000.0,
            max_ms: stats.max * 1000.0,
            runs: stats.count,
            samples_ms: result.samples.iter().map(|s| s.as_millis()).collect(),
        }
    }
}

/// Complete result of a `run`, as emitted with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub generated_at: DateTime<Utc>,
    pub binary: PathBuf,
    pub corpus: CorpusInfo,
    pub iterations: usize,
    pub warmups: usize,
    pub discarded: usize,
    pub variants: Vec<VariantSummary>,
    /// Baseline mean over accelerated mean; `null` when not finite.
    #[serde(serialize_with = "serialize_finite")]
    pub speedup: f64,
}

impl BenchmarkReport {
    /// Assemble the report. `results` must be in run order, baseline first;
    /// `rustflags` gives the directive each variant ran under.
    #[must_use]
    pub fn new(
        binary: PathBuf,
        corpus: CorpusInfo,
        iterations: usize,
        warmups: usize,
        results: &[VariantResult],
        rustflags: impl Fn(&Variant) -> String,
    ) -> Self {
        let discarded = crate::model::warmups_to_discard(iterations, warmups);
        let stats: Vec<SummaryStatistics> = results.iter().map(summarize).collect();
        let ratio = match stats.as_slice() {
            [baseline, accelerated, ..] => speedup(baseline, accelerated),
            _ => f64::NAN,
        };
        let variants = results
            .iter()
            .zip(&stats)
            .map(|(result, stats)| {
                VariantSummary::from_statistics(result, stats, rustflags(&result.variant))
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            binary,
            corpus,
            iterations,
            warmups,
            discarded,
            variants,
            speedup: ratio,
        }
    }

    /// `scalar/neon`, from the first two variant labels.
    #[must_use]
    pub fn ratio_label(&self) -> String {
        self.variants
            .iter()
            .take(2)
            .map(|v| v.label.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_finite<S: serde::Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}
