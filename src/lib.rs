//! `benchneon`: A/B benchmark harness for a compile-time SIMD feature.
//!
//! Generates a deterministic synthetic theme, resolves (or builds) the
//! program under test, times it with the feature disabled and enabled via a
//! `RUSTFLAGS` override, and reports mean, median, extremes and speedup.

pub mod binary;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod output;
pub mod runner;
pub mod stats;
pub mod util;

pub use error::{BenchError, ErrorCode, Result, StructuredError};
