use benchneon::cli::commands;
use benchneon::cli::{Cli, Commands};
use benchneon::logging::init_logging;
use benchneon::output::OutputContext;
use benchneon::util::InterruptFlag;
use benchneon::{BenchError, StructuredError};
use clap::Parser;
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, None) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let ctx = OutputContext::from_args(&cli);
    let config_file = cli.config.as_deref();

    let result = match &cli.command {
        Commands::Run(args) => InterruptFlag::install()
            .and_then(|interrupt| commands::run::execute(args, config_file, &ctx, &interrupt)),
        Commands::Corpus(args) => commands::corpus::execute(args, config_file, &ctx),
        Commands::Version => commands::version::execute(&ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &BenchError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
