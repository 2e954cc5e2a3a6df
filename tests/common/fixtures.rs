//! Shell stand-ins for the program under test and for cargo.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Records `<mode-flag> <corpus> | $RUSTFLAGS | $PROBE` per invocation in
/// `$CALLS_LOG`, exits 3 if the corpus is missing and exits 1 on the
/// invocation number given by `$FAIL_ON`.
const FAKE_PROGRAM: &str = r#"#!/bin/sh
[ -f "$2" ] || exit 3
echo "$1 $(basename "$2") | $RUSTFLAGS | $PROBE" >> "$CALLS_LOG"
n=$(wc -l < "$CALLS_LOG" | tr -d ' ')
if [ -n "$FAIL_ON" ] && [ "$n" -eq "$FAIL_ON" ]; then
  exit 1
fi
exit 0
"#;

/// Accepts `build --manifest-path <m> --profile <p>`, logs its argv to
/// `$CARGO_LOG` and copies `$FAKE_PROGRAM` into the conventional artifact
/// path unless `$CARGO_SKIP_ARTIFACT` is set. Exits with `$CARGO_EXIT`.
const FAKE_CARGO: &str = r#"#!/bin/sh
[ -n "$CARGO_LOG" ] && echo "$*" >> "$CARGO_LOG"
if [ -n "$CARGO_EXIT" ] && [ "$CARGO_EXIT" -ne 0 ]; then
  echo "error: could not compile" >&2
  exit "$CARGO_EXIT"
fi
if [ -z "$CARGO_SKIP_ARTIFACT" ]; then
  root=$(dirname "$3")
  case "$5" in
    dev) dir=debug ;;
    *) dir="$5" ;;
  esac
  mkdir -p "$root/target/$dir"
  cp "$FAKE_PROGRAM" "$root/target/$dir/oxocarbon-themec"
  chmod 755 "$root/target/$dir/oxocarbon-themec"
fi
exit 0
"#;

pub fn write_script(path: &Path, body: &str, mode: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("script dir");
    }
    fs::write(path, body).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("chmod");
    path.to_path_buf()
}

pub fn fake_program(dir: &Path) -> PathBuf {
    write_script(&dir.join("fake-themec"), FAKE_PROGRAM, 0o755)
}

pub fn fake_cargo(dir: &Path) -> PathBuf {
    write_script(&dir.join("fake-cargo"), FAKE_CARGO, 0o755)
}

/// Place the fake program where `target/<profile_dir>/oxocarbon-themec` is expected.
pub fn install_artifact(root: &Path, profile_dir: &str) -> PathBuf {
    write_script(
        &root
            .join("target")
            .join(profile_dir)
            .join("oxocarbon-themec"),
        FAKE_PROGRAM,
        0o755,
    )
}

/// Lines recorded by the fake program; empty if it never ran.
pub fn read_calls(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .map(|body| body.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
