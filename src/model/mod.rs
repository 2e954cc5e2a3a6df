//! Core data types for the benchmark pipeline.
//!
//! Contains the types that flow between the stages:
//! - `Profile`: build optimization mode of the binary under test
//! - `FeatureFlag` / `Variant`: the two execution modes being compared
//! - `TimingSample` / `VariantResult`: what the runner hands the statistics

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::BenchError;

/// Build optimization profile of the binary under test.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Release,
    Dev,
}

impl Profile {
    /// Profile name as passed to `cargo build --profile`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Dev => "dev",
        }
    }

    /// Directory under `target/` where cargo places artifacts for this profile.
    #[must_use]
    pub const fn target_dir(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Dev => "debug",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Profile {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "release" => Ok(Self::Release),
            "dev" | "debug" => Ok(Self::Dev),
            other => Err(BenchError::validation(
                "profile",
                format!("expected release or dev, got '{other}'"),
            )),
        }
    }
}

/// Whether the compiler feature is switched on or off for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFlag {
    Enabled,
    Disabled,
}

impl FeatureFlag {
    #[must_use]
    pub const fn sign(&self) -> char {
        match self {
            Self::Enabled => '+',
            Self::Disabled => '-',
        }
    }

    /// Render as a `-C target-feature=` directive, e.g. `-C target-feature=+neon`.
    #[must_use]
    pub fn directive(&self, feature: &str) -> String {
        format!("-C target-feature={}{feature}", self.sign())
    }
}

/// One of the two execution modes compared per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub label: String,
    pub flag: FeatureFlag,
}

impl Variant {
    #[must_use]
    pub fn new(label: impl Into<String>, flag: FeatureFlag) -> Self {
        Self {
            label: label.into(),
            flag,
        }
    }

    /// The `scalar` baseline and the accelerated variant named after `feature`,
    /// in the order they are executed.
    #[must_use]
    pub fn pair(feature: &str) -> [Self; 2] {
        [
            Self::new("scalar", FeatureFlag::Disabled),
            Self::new(feature, FeatureFlag::Enabled),
        ]
    }
}

/// Wall-clock duration of a single timed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimingSample(Duration);

impl TimingSample {
    #[must_use]
    pub const fn new(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    #[must_use]
    pub fn as_secs(&self) -> f64 {
        self.0.as_secs_f64()
    }

    #[must_use]
    pub fn as_millis(&self) -> f64 {
        self.0.as_secs_f64() * 1000.0
    }
}

/// Retained samples for one variant, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResult {
    pub variant: Variant,
    pub samples: Vec<TimingSample>,
    /// Warmup samples dropped from the front.
    pub discarded: usize,
}

impl VariantResult {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.variant.label
    }

    #[must_use]
    pub fn seconds(&self) -> Vec<f64> {
        self.samples.iter().map(TimingSample::as_secs).collect()
    }
}

/// Number of leading samples dropped as warmup.
///
/// Clamped so that at least one sample survives whenever `iterations >= 1`.
#[must_use]
pub fn warmups_to_discard(iterations: usize, warmups: usize) -> usize {
    warmups.min(iterations.saturating_sub(1))
}
