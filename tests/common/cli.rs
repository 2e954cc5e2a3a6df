use assert_cmd::Command;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct BenchRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl BenchRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// The structured error printed on stderr (JSON because stdout is piped).
    pub fn error_json(&self) -> Value {
        let payload = extract_json_payload(&self.stderr);
        serde_json::from_str(&payload)
            .unwrap_or_else(|e| panic!("stderr is not a JSON error ({e}):\n{}", self.stderr))
    }

    pub fn error_code(&self) -> String {
        self.error_json()["error"]["code"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    pub fn stdout_json(&self) -> Value {
        let payload = extract_json_payload(&self.stdout);
        serde_json::from_str(&payload)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

/// Isolated directory tree for one CLI invocation.
///
/// `root` doubles as `HOME` and holds `tmp/` (used as `TMPDIR`) and `logs/`.
pub struct BenchWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub tmp_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl BenchWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let tmp_dir = root.join("tmp");
        let log_dir = root.join("logs");
        fs::create_dir_all(&tmp_dir).expect("tmp dir");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            tmp_dir,
            log_dir,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Entries left behind in the scratch parent.
    pub fn scratch_leftovers(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.tmp_dir)
            .expect("read tmp dir")
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect()
    }
}

pub fn run_benchneon<I, S>(workspace: &BenchWorkspace, args: I, label: &str) -> BenchRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_benchneon_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_benchneon_with_env<I, S, E, K, V>(
    workspace: &BenchWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> BenchRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    run_benchneon_full(workspace, args, env_vars, None, label)
}

pub fn run_benchneon_full<I, S, E, K, V>(
    workspace: &BenchWorkspace,
    args: I,
    env_vars: E,
    stdin: Option<&str>,
    label: &str,
) -> BenchRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("benchneon"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "benchneon=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);
    cmd.env("TMPDIR", &workspace.tmp_dir);
    cmd.envs(env_vars);
    if let Some(input) = stdin {
        cmd.write_stdin(input.to_string());
    }

    let start = Instant::now();
    let output = cmd.output().expect("run benchneon");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let timestamp = SystemTime::now();
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        timestamp,
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    BenchRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

/// Everything from the first line that opens a JSON value.
pub fn extract_json_payload(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return lines[idx..].join("\n").trim().to_string();
        }
    }
    output.trim().to_string()
}

pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
