//! Run command implementation: the full A/B pipeline.
//!
//! scratch dir → corpus → binary → variants → report. Every stage returns
//! `Result`; the scratch directory guard cleans up on any early return.

use crate::binary::{BinaryResolver, CargoBuilder};
use super::resolve_root;
use crate::cli::RunArgs;
use crate::config::{self, BenchmarkConfig};
use crate::corpus::{self, CORPUS_FILE_NAME};
use crate::error::Result;
use crate::format::{BenchmarkReport, format_corpus_line, report_lines};
use crate::model::Variant;
use crate::output::{OutputContext, OutputMode, SummaryTable};
use crate::runner::{ChildEnvironment, VariantRunner};
use crate::util::interrupt::InterruptFlag;
use crate::util::progress::{create_spinner, should_show_progress};
use crate::util::scratch::ScratchDir;
use std::io::{self, Write as _};
use std::path::Path;
use tracing::info;

/// Execute the run command.
///
/// # Errors
///
/// Returns the first error of any stage; no report is printed in that case.
pub fn execute(
    args: &RunArgs,
    config_file: Option<&Path>,
    ctx: &OutputContext,
    interrupt: &InterruptFlag,
) -> Result<()> {
    let root = resolve_root(args.root.as_deref())?;
    let layer = config::load_config(&root, config_file, &args.overrides())?;
    let config = BenchmarkConfig::from_layer(&layer, root)?;
    let env = ChildEnvironment::capture();

    let scratch = ScratchDir::create()?;
    let report = benchmark(&config, &env, &scratch, ctx, interrupt)?;
    print_report(&report, ctx)?;

    if config.keep_temp {
        let stdin = io::BufReader::new(io::stdin());
        scratch.keep_until_acknowledged(stdin, interrupt, |path| {
            eprintln!("Temporary directory preserved at {}", path.display());
            eprint!("Press Enter to continue and clean up...");
            let _ = io::stderr().flush();
        })
    } else {
        scratch.release()
    }
}

/// Generate, resolve and measure inside an existing scratch directory.
///
/// # Errors
///
/// Propagates corpus, resolution, build and execution failures.
pub fn benchmark(
    config: &BenchmarkConfig,
    env: &ChildEnvironment,
    scratch: &ScratchDir,
    ctx: &OutputContext,
    interrupt: &InterruptFlag,
) -> Result<BenchmarkReport> {
    let show_progress = ctx.wants_progress() && should_show_progress();

    let spinner = create_spinner("Generating corpus", show_progress);
    let corpus = corpus::generate(
        &scratch.join(CORPUS_FILE_NAME),
        config.tokens,
        config.color_keys,
    )?;
    spinner.finish_and_clear();
    ctx.info(&format_corpus_line(&corpus));
    interrupt.check()?;

    let builder = CargoBuilder::new(&config.cargo).interrupt(interrupt);
    let resolver = BinaryResolver::new(
        &config.root,
        config.profile,
        &config.binary_name,
        &builder,
    );
    let binary = resolver.resolve(config.binary.as_deref(), config.allow_build)?;
    interrupt.check()?;

    let runner = VariantRunner::new(&binary, &corpus.path, env)
        .mode_flag(&config.mode_flag)
        .feature(&config.feature)
        .flag_env(&config.flag_env)
        .interrupt(interrupt)
        .show_progress(show_progress);

    let variants = Variant::pair(&config.feature);
    let results = runner.run_all(&variants, config.iterations, config.warmups)?;
    let report = BenchmarkReport::new(
        binary.clone(),
        corpus.clone(),
        config.iterations,
        config.warmups,
        &results,
        |variant| runner.directive_for(variant),
    );
    info!(
        speedup = report.speedup,
        retained = config.retained(),
        "Benchmark complete"
    );
    Ok(report)
}

fn print_report(report: &BenchmarkReport, ctx: &OutputContext) -> Result<()> {
    match ctx.mode() {
        OutputMode::Json => ctx.json(report)?,
        OutputMode::Rich => {
            let table = SummaryTable::from_report(report, ctx.theme()).build();
            ctx.render(&table);
            let color = if report.speedup >= 1.0 { "green" } else { "red" };
            ctx.print(&format!(
                "Speedup ({}): [bold {color}]{}[/]",
                report.ratio_label(),
                crate::format::format_ratio(report.speedup)
            ));
        }
        OutputMode::Plain => {
            for line in report_lines(report) {
                ctx.print(&line);
            }
        }
        OutputMode::Quiet => {}
    }
    Ok(())
}
