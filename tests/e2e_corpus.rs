mod common;

use benchneon::corpus::render;
use benchneon::util::fingerprint;
use common::cli::{BenchWorkspace, path_arg, run_benchneon, run_benchneon_with_env};
use std::fs;

#[test]
fn e2e_corpus_writes_rendered_content() {
    let _log = common::test_log("e2e_corpus_writes_rendered_content");
    let workspace = BenchWorkspace::new();
    let out = workspace.path("theme.toml");

    let run = run_benchneon(
        &workspace,
        [
            "corpus",
            "--tokens",
            "7",
            "--color-keys",
            "4",
            "-o",
            &path_arg(&out),
        ],
        "corpus_plain",
    );
    assert!(run.status.success(), "corpus failed: {}", run.stderr);

    let written = fs::read_to_string(&out).expect("read corpus");
    assert_eq!(written, render(7, 4));
    assert!(run.stdout.contains("Generated synthetic theme: "));
    assert!(
        run.stdout
            .contains(&format!("sha256: {}", fingerprint(written.as_bytes())))
    );
}

#[test]
fn e2e_corpus_json_fingerprint() {
    let _log = common::test_log("e2e_corpus_json_fingerprint");
    let workspace = BenchWorkspace::new();
    let out = workspace.path("theme.toml");

    let run = run_benchneon(
        &workspace,
        [
            "corpus",
            "--json",
            "--tokens",
            "0",
            "--color-keys",
            "0",
            "--output",
            &path_arg(&out),
        ],
        "corpus_json",
    );
    assert!(run.status.success(), "corpus failed: {}", run.stderr);

    let info = run.stdout_json();
    let expected = render(0, 0);
    assert_eq!(info["tokens"], 0);
    assert_eq!(info["color_keys"], 0);
    assert_eq!(info["bytes"], expected.len());
    assert_eq!(info["sha256"], fingerprint(expected.as_bytes()));
    assert_eq!(info["path"], path_arg(&out));
}

#[test]
fn e2e_corpus_sizes_from_env() {
    let _log = common::test_log("e2e_corpus_sizes_from_env");
    let workspace = BenchWorkspace::new();
    let out = workspace.path("theme.toml");

    let run = run_benchneon_with_env(
        &workspace,
        ["corpus", "-o", &path_arg(&out)],
        [("BENCHNEON_TOKENS", "3"), ("BENCHNEON_COLOR_KEYS", "2")],
        "corpus_env",
    );
    assert!(run.status.success(), "corpus failed: {}", run.stderr);
    assert_eq!(fs::read_to_string(&out).expect("read"), render(3, 2));
}

#[test]
fn e2e_corpus_reads_project_config_from_root() {
    let _log = common::test_log("e2e_corpus_reads_project_config_from_root");
    let workspace = BenchWorkspace::new();
    let project = workspace.path("project");
    fs::create_dir_all(&project).expect("project dir");
    fs::write(project.join("benchneon.yaml"), "tokens: 4\ncolor_keys: 1\n")
        .expect("write config");
    let out = workspace.path("theme.toml");

    let run = run_benchneon(
        &workspace,
        ["corpus", "--root", &path_arg(&project), "-o", &path_arg(&out)],
        "corpus_root",
    );
    assert!(run.status.success(), "corpus failed: {}", run.stderr);
    assert_eq!(fs::read_to_string(&out).expect("read"), render(4, 1));

    // CLI sizes still beat the project file.
    let run = run_benchneon(
        &workspace,
        [
            "corpus",
            "--root",
            &path_arg(&project),
            "--tokens",
            "2",
            "-o",
            &path_arg(&out),
        ],
        "corpus_root_cli",
    );
    assert!(run.status.success(), "corpus failed: {}", run.stderr);
    assert_eq!(fs::read_to_string(&out).expect("read"), render(2, 1));
}

#[test]
fn e2e_corpus_into_missing_directory() {
    let _log = common::test_log("e2e_corpus_into_missing_directory");
    let workspace = BenchWorkspace::new();
    let out = workspace.path("missing/theme.toml");

    let run = run_benchneon(
        &workspace,
        ["corpus", "--tokens", "1", "-o", &path_arg(&out)],
        "corpus_missing_dir",
    );
    assert_eq!(run.code(), Some(7));
    assert_eq!(run.error_code(), "IO_ERROR");
}
