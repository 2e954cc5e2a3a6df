//! Version command implementation.

use crate::error::Result;
use crate::output::OutputContext;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    target_arch: &'a str,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(ctx: &OutputContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };
    let target_arch = std::env::consts::ARCH;

    if ctx.is_json() {
        return ctx.json(&VersionOutput {
            version,
            build,
            target_arch,
        });
    }

    println!("benchneon version {version} ({build}, {target_arch})");
    Ok(())
}
