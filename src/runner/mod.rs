//! Timed execution of the binary under test.
//!
//! Each variant is run `iterations` times, strictly one after another, with
//! the child's environment derived from an immutable snapshot of the
//! harness's own environment plus a single `RUSTFLAGS` override. The first
//! `min(warmups, iterations - 1)` samples are dropped before the result is
//! handed to the statistics.

mod env;

pub use env::ChildEnvironment;

use crate::error::{BenchError, Result};
use crate::model::{TimingSample, Variant, VariantResult, warmups_to_discard};
use crate::util::interrupt::InterruptFlag;
use crate::util::progress::create_progress_bar;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, info};

/// Default argument selecting the monochrome transform.
pub const DEFAULT_MODE_FLAG: &str = "--mono";
/// Default compiler feature toggled between the variants.
pub const DEFAULT_FEATURE: &str = "neon";
/// Environment variable carrying the target-feature directive.
pub const DEFAULT_FLAG_ENV: &str = "RUSTFLAGS";

/// Executes variants against one binary and one corpus.
pub struct VariantRunner<'a> {
    binary: &'a Path,
    corpus: &'a Path,
    env: &'a ChildEnvironment,
    mode_flag: &'a str,
    feature: &'a str,
    flag_env: &'a str,
    interrupt: Option<&'a InterruptFlag>,
    show_progress: bool,
}

impl<'a> VariantRunner<'a> {
    #[must_use]
    pub fn new(binary: &'a Path, corpus: &'a Path, env: &'a ChildEnvironment) -> Self {
        Self {
            binary,
            corpus,
            env,
            mode_flag: DEFAULT_MODE_FLAG,
            feature: DEFAULT_FEATURE,
            flag_env: DEFAULT_FLAG_ENV,
            interrupt: None,
            show_progress: false,
        }
    }

    #[must_use]
    pub fn mode_flag(mut self, mode_flag: &'a str) -> Self {
        self.mode_flag = mode_flag;
        self
    }

    #[must_use]
    pub fn feature(mut self, feature: &'a str) -> Self {
        self.feature = feature;
        self
    }

    #[must_use]
    pub fn flag_env(mut self, flag_env: &'a str) -> Self {
        self.flag_env = flag_env;
        self
    }

    #[must_use]
    pub fn interrupt(mut self, flag: &'a InterruptFlag) -> Self {
        self.interrupt = Some(flag);
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The directive placed in the flag variable for `variant`.
    #[must_use]
    pub fn directive_for(&self, variant: &Variant) -> String {
        variant.flag.directive(self.feature)
    }

    /// Time `iterations` invocations of `variant` and drop the warmup prefix.
    ///
    /// # Errors
    ///
    /// - `ChildProcessFailure` on the first repetition that exits unsuccessfully
    /// - an I/O error if the binary cannot be spawned
    /// - `Interrupted` if Ctrl-C arrived during the run
    pub fn run(
        &self,
        variant: &Variant,
        iterations: usize,
        warmups: usize,
    ) -> Result<VariantResult> {
        let directive = self.directive_for(variant);
        let child_env = self.env.with_override(self.flag_env, &directive);
        let discard = warmups_to_discard(iterations, warmups);

        info!(
            variant = %variant.label,
            %directive,
            iterations,
            discard,
            "Running variant"
        );

        let progress = create_progress_bar(iterations as u64, &variant.label, self.show_progress);
        let mut timings = Vec::with_capacity(iterations);

        for iteration in 1..=iterations {
            let mut cmd = Command::new(self.binary);
            cmd.arg(self.mode_flag)
                .arg(self.corpus)
                .env_clear()
                .envs(&child_env)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());

            let start = Instant::now();
            let status = cmd.status().map_err(|e| {
                BenchError::io_at(format!("spawning {}", self.binary.display()), e)
            });
            let elapsed = start.elapsed();
            let status = match status {
                Ok(status) => status,
                Err(e) => {
                    progress.abandon();
                    return Err(e);
                }
            };

            if let Some(flag) = self.interrupt {
                if let Err(e) = flag.check() {
                    progress.abandon();
                    return Err(e);
                }
            }

            if !status.success() {
                progress.abandon();
                return Err(BenchError::ChildProcessFailure {
                    variant: variant.label.clone(),
                    iteration,
                    code: status.code(),
                });
            }

            debug!(
                variant = %variant.label,
                iteration,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                "Repetition finished"
            );
            timings.push(TimingSample::new(elapsed));
            progress.inc(1);
        }
        progress.finish_and_clear();

        let samples = timings.split_off(discard);
        debug!(
            variant = %variant.label,
            discarded = discard,
            retained = samples.len(),
            "Warmups discarded"
        );

        Ok(VariantResult {
            variant: variant.clone(),
            samples,
            discarded: discard,
        })
    }

    /// Run every variant in order; the first failure aborts the rest.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`VariantRunner::run`].
    pub fn run_all(
        &self,
        variants: &[Variant],
        iterations: usize,
        warmups: usize,
    ) -> Result<Vec<VariantResult>> {
        variants
            .iter()
            .map(|variant| self.run(variant, iterations, warmups))
            .collect()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::model::FeatureFlag;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Shell stand-in for the program under test.
    ///
    /// Appends `<argv> | $RUSTFLAGS | $PROBE` to `calls.log` and exits 1 on
    /// the repetition number stored in `$FAIL_ON`, if any.
    fn fake_binary(dir: &Path) -> PathBuf {
        let path = dir.join("fake-themec");
        let script = r#"#!/bin/sh
log="$(dirname "$0")/calls.log"
echo "$1 $2 | $RUSTFLAGS | $PROBE" >> "$log"
n=$(wc -l < "$log" | tr -d ' ')
if [ -n "$FAIL_ON" ] && [ "$n" -eq "$FAIL_ON" ]; then
  exit 1
fi
exit 0
"#;
        fs::write(&path, script).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    fn calls(dir: &Path) -> Vec<String> {
        fs::read_to_string(dir.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn env_with(extra: &[(&str, &str)]) -> ChildEnvironment {
        let mut vars: Vec<(String, String)> = vec![("PATH".into(), "/usr/bin:/bin".into())];
        vars.extend(extra.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));
        ChildEnvironment::from_vars(vars)
    }

    #[test]
    fn retains_iterations_minus_warmups() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[]);

        let runner = VariantRunner::new(&bin, &corpus, &env);
        let result = runner
            .run(&Variant::new("scalar", FeatureFlag::Disabled), 5, 2)
            .expect("run");

        assert_eq!(result.samples.len(), 3);
        assert_eq!(result.discarded, 2);
        assert_eq!(result.label(), "scalar");
        assert_eq!(calls(dir.path()).len(), 5);
    }

    #[test]
    fn single_iteration_keeps_its_sample() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[]);

        let result = VariantRunner::new(&bin, &corpus, &env)
            .run(&Variant::new("neon", FeatureFlag::Enabled), 1, 5)
            .expect("run");
        assert_eq!(result.samples.len(), 1);
        assert_eq!(result.discarded, 0);
    }

    #[test]
    fn passes_mode_flag_corpus_and_directive() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[("PROBE", "kept"), ("RUSTFLAGS", "-C opt-level=0")]);

        let runner = VariantRunner::new(&bin, &corpus, &env);
        runner
            .run_all(&Variant::pair("neon"), 1, 0)
            .expect("run all");

        let lines = calls(dir.path());
        let corpus_str = corpus.display().to_string();
        assert_eq!(
            lines,
            vec![
                format!("--mono {corpus_str} | -C target-feature=-neon | kept"),
                format!("--mono {corpus_str} | -C target-feature=+neon | kept"),
            ]
        );
    }

    #[test]
    fn custom_feature_and_mode_flag() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[]);

        VariantRunner::new(&bin, &corpus, &env)
            .feature("avx2")
            .mode_flag("--monochrome")
            .run(&Variant::new("avx2", FeatureFlag::Enabled), 1, 0)
            .expect("run");

        let lines = calls(dir.path());
        assert!(lines[0].starts_with("--monochrome "));
        assert!(lines[0].contains("-C target-feature=+avx2"));
    }

    #[test]
    fn harness_environment_is_not_mutated() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let before = std::env::var_os("RUSTFLAGS");
        let env = ChildEnvironment::capture();

        VariantRunner::new(&bin, &corpus, &env)
            .run(&Variant::new("neon", FeatureFlag::Enabled), 1, 0)
            .expect("run");

        assert_eq!(std::env::var_os("RUSTFLAGS"), before);
        assert_eq!(env.get("RUSTFLAGS"), before.as_deref());
    }

    #[test]
    fn failure_on_third_repetition_fails_variant() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[("FAIL_ON", "3")]);

        let err = VariantRunner::new(&bin, &corpus, &env)
            .run(&Variant::new("scalar", FeatureFlag::Disabled), 6, 1)
            .expect_err("must fail");

        match err {
            BenchError::ChildProcessFailure {
                variant,
                iteration,
                code,
            } => {
                assert_eq!(variant, "scalar");
                assert_eq!(iteration, 3);
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls(dir.path()).len(), 3, "no repetition after the failure");
    }

    #[test]
    fn failing_first_variant_skips_second() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[("FAIL_ON", "2")]);

        let err = VariantRunner::new(&bin, &corpus, &env)
            .run_all(&Variant::pair("neon"), 3, 0)
            .expect_err("must fail");
        assert!(matches!(err, BenchError::ChildProcessFailure { .. }));
        assert!(calls(dir.path()).iter().all(|l| l.contains("-neon")));
    }

    #[test]
    fn interrupt_stops_the_run() {
        let dir = TempDir::new().expect("tempdir");
        let bin = fake_binary(dir.path());
        let corpus = dir.path().join("corpus.toml");
        fs::write(&corpus, "").expect("corpus");
        let env = env_with(&[]);
        let flag = InterruptFlag::new();
        flag.trigger();

        let err = VariantRunner::new(&bin, &corpus, &env)
            .interrupt(&flag)
            .run(&Variant::new("scalar", FeatureFlag::Disabled), 4, 0)
            .expect_err("must stop");
        assert!(matches!(err, BenchError::Interrupted));
        assert_eq!(calls(dir.path()).len(), 1);
    }

    #[test]
    fn missing_binary_is_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let bin = dir.path().join("absent");
        let corpus = dir.path().join("corpus.toml");
        let env = env_with(&[]);

        let err = VariantRunner::new(&bin, &corpus, &env)
            .run(&Variant::new("scalar", FeatureFlag::Disabled), 1, 0)
            .expect_err("must fail");
        assert!(err.to_string().starts_with("spawning "));
    }
}
