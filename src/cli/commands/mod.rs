//! Subcommand implementations, one module per command.

pub mod completions;
pub mod corpus;
pub mod run;
pub mod version;

use crate::error::{BenchError, Result};
use std::path::{Path, PathBuf};

/// `--root` if given, else the current directory.
pub(crate) fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| BenchError::io_at("resolving current directory", e)),
    }
}
