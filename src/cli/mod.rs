//! CLI definitions and entry point.

use crate::config::CliOverrides;
use crate::model::Profile;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// A/B benchmark harness for SIMD feature toggles
#[derive(Parser, Debug)]
#[command(name = "benchneon", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Extra YAML config file, applied above the project config
    #[arg(long, global = true, env = "BENCHNEON_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark the scalar and accelerated variants of the binary
    Run(RunArgs),

    /// Write the synthetic corpus to a file and report its fingerprint
    Corpus(CorpusArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the run command.
///
/// Unset options fall through to config files, `BENCHNEON_*` variables and
/// finally the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of `[[tokenColors]]` records in the corpus [default: 60000]
    #[arg(long)]
    pub tokens: Option<usize>,

    /// Number of flat `[colors]` entries in the corpus [default: 6000]
    #[arg(long)]
    pub color_keys: Option<usize>,

    /// Timed invocations per variant, warmups included [default: 12]
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Leading samples to discard per variant [default: 2]
    #[arg(long)]
    pub warmups: Option<usize>,

    /// Build profile of the binary under test [default: release]
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Use this binary instead of the conventional build artifact
    #[arg(long)]
    pub bin: Option<PathBuf>,

    /// Fail instead of building when the artifact is missing
    #[arg(long)]
    pub no_build: bool,

    /// Keep the scratch directory until Enter is pressed
    #[arg(long)]
    pub keep_temp: bool,

    /// Project root holding Cargo.toml and target/ [default: current directory]
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Name of the binary under test [default: oxocarbon-themec]
    #[arg(long)]
    pub binary_name: Option<String>,

    /// Target feature toggled between the variants [default: neon]
    #[arg(long)]
    pub feature: Option<String>,

    /// Mode flag passed before the corpus path [default: --mono]
    #[arg(long, allow_hyphen_values = true)]
    pub mode_flag: Option<String>,
}

impl RunArgs {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            tokens: self.tokens,
            color_keys: self.color_keys,
            iterations: self.iterations,
            warmups: self.warmups,
            profile: self.profile,
            bin: self.bin.clone(),
            no_build: self.no_build.then_some(true),
            keep_temp: self.keep_temp.then_some(true),
            binary_name: self.binary_name.clone(),
            feature: self.feature.clone(),
            mode_flag: self.mode_flag.clone(),
        }
    }
}

/// Arguments for the corpus command.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Number of `[[tokenColors]]` records [default: 60000]
    #[arg(long)]
    pub tokens: Option<usize>,

    /// Number of flat `[colors]` entries [default: 6000]
    #[arg(long)]
    pub color_keys: Option<usize>,

    /// Destination file (overwritten if present)
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Project root whose benchneon.yaml is read [default: current directory]
    #[arg(long)]
    pub root: Option<PathBuf>,
}

impl CorpusArgs {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            tokens: self.tokens,
            color_keys: self.color_keys,
            ..CliOverrides::default()
        }
    }
}

/// Arguments for the completions command.
#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Supported shells for completion generation.
#[derive(ValueEnum, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}
