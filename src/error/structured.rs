//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Category exit codes
//! - Context for debugging (paths, exit codes, variant names)

use crate::error::BenchError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Binary Errors (exit code 2) ===
    /// Explicit binary missing or not executable
    InvalidBinary,
    /// No binary and building disabled
    BinaryMissing,

    // === Build Errors (exit code 3) ===
    /// Build collaborator exited non-zero
    BuildFailed,
    /// Build succeeded without producing the artifact
    BuildArtifactMissing,

    // === Measurement Errors (exit code 4) ===
    /// A timed repetition exited non-zero
    ChildProcessFailure,

    // === Validation Errors (exit code 5) ===
    /// Config value failed validation
    ValidationFailed,

    // === Config Errors (exit code 6) ===
    /// Configuration error
    ConfigError,
    /// YAML parsing error
    YamlError,

    // === I/O Errors (exit code 7) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Interrupt (exit code 130) ===
    /// Ctrl-C received
    Interrupted,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidBinary => "INVALID_BINARY",
            Self::BinaryMissing => "BINARY_MISSING",
            Self::BuildFailed => "BUILD_FAILED",
            Self::BuildArtifactMissing => "BUILD_ARTIFACT_MISSING",
            Self::ChildProcessFailure => "CHILD_PROCESS_FAILURE",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::YamlError => "YAML_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::Interrupted => "INTERRUPTED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get the exit code for this error category.
    ///
    /// Exit codes are grouped by error category:
    /// - 1: Internal/unknown errors
    /// - 2: Binary resolution errors
    /// - 3: Build errors
    /// - 4: Measurement errors
    /// - 5: Validation errors
    /// - 6: Config errors
    /// - 7: I/O errors
    /// - 130: Interrupted (128 + SIGINT)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidBinary | Self::BinaryMissing => 2,
            Self::BuildFailed | Self::BuildArtifactMissing => 3,
            Self::ChildProcessFailure => 4,
            Self::ValidationFailed => 5,
            Self::ConfigError | Self::YamlError => 6,
            Self::IoError | Self::JsonError => 7,
            Self::Interrupted => 130,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `BenchError`.
    #[must_use]
    pub fn from_error(err: &BenchError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);

        Self {
            code,
            message: err.to_string(),
            hint: err.suggestion().map(str::to_string),
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &BenchError) -> (ErrorCode, Option<Value>) {
        match err {
            BenchError::InvalidBinary { path, reason } => (
                ErrorCode::InvalidBinary,
                Some(json!({"path": path.display().to_string(), "reason": reason})),
            ),
            BenchError::BinaryMissing { path } => (
                ErrorCode::BinaryMissing,
                Some(json!({"path": path.display().to_string()})),
            ),
            BenchError::BuildFailed { manifest, code } => (
                ErrorCode::BuildFailed,
                Some(json!({"manifest": manifest.display().to_string(), "exit_code": code})),
            ),
            BenchError::BuildArtifactMissing { path } => (
                ErrorCode::BuildArtifactMissing,
                Some(json!({"path": path.display().to_string()})),
            ),
            BenchError::ChildProcessFailure {
                variant,
                iteration,
                code,
            } => (
                ErrorCode::ChildProcessFailure,
                Some(json!({"variant": variant, "iteration": iteration, "exit_code": code})),
            ),
            BenchError::Interrupted => (ErrorCode::Interrupted, None),
            BenchError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            BenchError::Config(_) => (ErrorCode::ConfigError, None),
            BenchError::Yaml(_) => (ErrorCode::YamlError, None),
            BenchError::Io(_) => (ErrorCode::IoError, None),
            BenchError::Json(_) => (ErrorCode::JsonError, None),
            BenchError::WithContext { context, source } => {
                let code = if source.is::<std::io::Error>() {
                    ErrorCode::IoError
                } else {
                    ErrorCode::InternalError
                };
                (code, Some(json!({"context": context})))
            }
            BenchError::Other(_) => (ErrorCode::InternalError, None),
        }
    }
}
