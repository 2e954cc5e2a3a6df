//! Error types and handling for `benchneon`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Wraps `anyhow` for the odd third-party failure without a dedicated variant
//! - Provides recovery hints for user-facing errors
//! - Every variant is fatal; nothing is retried or swallowed

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `benchneon` operations.
#[derive(Error, Debug)]
pub enum BenchError {
    // === Binary Resolution Errors ===
    /// Explicit binary path is missing or lacks the executable bit.
    #[error("Binary at '{path}' is not executable: {reason}")]
    InvalidBinary { path: PathBuf, reason: String },

    /// No usable binary was found and building is disabled.
    #[error("Binary missing at '{path}' and building was disabled")]
    BinaryMissing { path: PathBuf },

    // === Build Errors ===
    /// The build collaborator exited unsuccessfully.
    #[error("Build of '{manifest}' failed ({})", describe_exit(.code))]
    BuildFailed {
        manifest: PathBuf,
        code: Option<i32>,
    },

    /// The build reported success but the artifact is not where it should be.
    #[error("Build succeeded but no binary was produced at '{path}'")]
    BuildArtifactMissing { path: PathBuf },

    // === Measurement Errors ===
    /// A timed repetition exited non-zero.
    #[error(
        "Variant '{variant}' failed on repetition {iteration} ({})",
        describe_exit(.code)
    )]
    ChildProcessFailure {
        variant: String,
        iteration: usize,
        code: Option<i32>,
    },

    /// The user interrupted the run.
    #[error("Interrupted")]
    Interrupted,

    // === Configuration Errors ===
    /// A configuration value failed validation.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}

impl BenchError {
    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidBinary { .. } => Some("Check the --bin path and run: chmod +x <path>"),
            Self::BinaryMissing { .. } => {
                Some("Drop --no-build, or point --bin at an existing binary")
            }
            Self::BuildFailed { .. } => Some("Scroll up for the build output"),
            Self::BuildArtifactMissing { .. } => {
                Some("Check --binary-name and CARGO_TARGET_DIR; the artifact landed elsewhere")
            }
            Self::ChildProcessFailure { .. } => {
                Some("Run the binary by hand against a kept corpus (--keep-temp)")
            }
            Self::Validation { .. } => {
                Some("Fix the value via its flag, BENCHNEON_* variable, or benchneon.yaml")
            }
            _ => None,
        }
    }

    /// Wrap an I/O error with the path it concerned.
    #[must_use]
    pub fn io_at(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `BenchError`.
pub type Result<T> = std::result::Result<T, BenchError>;
