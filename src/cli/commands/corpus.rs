//! Corpus command: write the synthetic theme somewhere permanent.

use super::resolve_root;
use crate::cli::CorpusArgs;
use crate::config::{self, BenchmarkConfig};
use crate::corpus;
use crate::error::Result;
use crate::format::format_corpus_line;
use crate::output::OutputContext;
use std::path::Path;

/// Execute the corpus command.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the file cannot be written.
pub fn execute(args: &CorpusArgs, config_file: Option<&Path>, ctx: &OutputContext) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let layer = config::load_config(&root, config_file, &args.overrides())?;
    let config = BenchmarkConfig::from_layer(&layer, root)?;

    let info = corpus::generate(&args.output, config.tokens, config.color_keys)?;

    if ctx.is_json() {
        ctx.json(&info)?;
    } else {
        ctx.success(&format_corpus_line(&info));
        ctx.print(&format!("sha256: {}", info.sha256));
    }
    Ok(())
}
