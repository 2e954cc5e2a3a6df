//! Output formatting for `benchneon`.
//!
//! - [`BenchmarkReport`] / [`VariantSummary`]: the JSON document printed by
//!   `run --json`
//! - [`text`]: the plain-text lines printed when stdout is not a terminal

mod report;
pub mod text;

pub use report::{BenchmarkReport, VariantSummary};
pub use text::{
    format_corpus_line, format_ratio, format_speedup_line, format_variant_line, report_lines,
};
