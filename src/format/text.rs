//! Plain-text rendering of benchmark results.

use super::report::{BenchmarkReport, VariantSummary};
use crate::corpus::CorpusInfo;

/// `scalar: mean=12.34 ms median=12.30 ms min=11.90 ms max=13.10 ms runs=10`
#[must_use]
pub fn format_variant_line(summary: &VariantSummary) -> String {
    format!(
        "{:>6}: mean={:.2} ms median={:.2} ms min={:.2} ms max={:.2} ms runs={}",
        summary.label,
        summary.mean_ms,
        summary.median_ms,
        summary.min_ms,
        summary.max_ms,
        summary.runs
    )
}

/// `Speedup (scalar/neon): 1.84x`; `inf` when the accelerated mean is zero.
#[must_use]
pub fn format_speedup_line(label: &str, ratio: f64) -> String {
    format!("Speedup ({label}): {}", format_ratio(ratio))
}

#[must_use]
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_infinite() {
        "infx".to_string()
    } else {
        format!("{ratio:.2}x")
    }
}

/// `Generated synthetic theme: 1.23 MiB at <path>`
#[must_use]
pub fn format_corpus_line(corpus: &CorpusInfo) -> String {
    format!(
        "Generated synthetic theme: {:.2} MiB at {}",
        corpus.size_mib(),
        corpus.path.display()
    )
}

/// Every line of the plain report, in print order.
#[must_use]
pub fn report_lines(report: &BenchmarkReport) -> Vec<String> {
    let mut lines: Vec<String> = report.variants.iter().map(format_variant_line).collect();
    lines.push(format_speedup_line(&report.ratio_label(), report.speedup));
    lines
}
