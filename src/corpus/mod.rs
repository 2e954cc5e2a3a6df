//! Synthetic theme corpus.
//!
//! Writes a TOML theme shaped like the inputs `oxocarbon-themec` transforms:
//! a two-line header, a flat `[colors]` table and a run of `[[tokenColors]]`
//! records. Content depends only on the two size parameters, so every run of
//! the harness feeds the binary byte-identical input.

use crate::error::{BenchError, Result};
use crate::util::hash::HashingWriter;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Accent colors cycled through by both sections, in index order.
pub const PALETTE: [&str; 10] = [
    "#08bdba", "#33b1ff", "#3ddbd9", "#42be65", "#78a9ff", "#82cfff", "#a6c8ff", "#be95ff",
    "#ee5396", "#ff7eb6",
];

/// File name of the corpus inside the scratch directory.
pub const CORPUS_FILE_NAME: &str = "benchmark-theme.toml";

/// Palette entry for index `i`.
#[must_use]
pub const fn accent(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

/// What was written, for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusInfo {
    pub path: PathBuf,
    pub tokens: usize,
    pub color_keys: usize,
    pub bytes: u64,
    pub sha256: String,
}

impl CorpusInfo {
    #[must_use]
    pub fn size_mib(&self) -> f64 {
        self.bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Stream the corpus into `out`.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_corpus<W: Write>(
    out: &mut W,
    tokens: usize,
    color_keys: usize,
) -> std::io::Result<()> {
    out.write_all(b"name = \"Benchmark Monochrome\"\n")?;
    out.write_all(b"type = \"dark\"\n\n")?;

    out.write_all(b"[colors]\n")?;
    for idx in 0..color_keys {
        writeln!(out, "color{idx} = \"{}\"", accent(idx))?;
    }
    out.write_all(b"\n")?;

    for idx in 0..tokens {
        out.write_all(b"[[tokenColors]]\n")?;
        writeln!(out, "name = \"token_{idx}\"")?;
        writeln!(out, "scope = [\"scope.{idx}\"]")?;
        writeln!(out, "settings = {{ foreground = \"{}\" }}", accent(idx))?;
    }

    Ok(())
}

/// Render the corpus into memory.
///
/// # Panics
///
/// Never in practice; the only sink is a `Vec`.
#[must_use]
pub fn render(tokens: usize, color_keys: usize) -> String {
    let mut buf = Vec::new();
    write_corpus(&mut buf, tokens, color_keys).expect("writing to a Vec is infallible");
    String::from_utf8_lossy(&buf).into_owned()
}

/// Create (or truncate) `path` and write the corpus to it.
///
/// # Errors
///
/// Returns an I/O error naming `path` if the file cannot be created or written.
pub fn generate(path: &Path, tokens: usize, color_keys: usize) -> Result<CorpusInfo> {
    debug!(path = %path.display(), tokens, color_keys, "Writing synthetic corpus");

    let write_err =
        |e: std::io::Error| BenchError::io_at(format!("writing corpus {}", path.display()), e);

    let file = File::create(path).map_err(write_err)?;
    let mut writer = HashingWriter::new(BufWriter::new(file));
    write_corpus(&mut writer, tokens, color_keys).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    let (buffered, bytes, sha256) = writer.finish();
    buffered
        .into_inner()
        .map_err(|e| write_err(e.into_error()))?
        .sync_all()
        .map_err(write_err)?;

    let info = CorpusInfo {
        path: path.to_path_buf(),
        tokens,
        color_keys,
        bytes,
        sha256,
    };
    info!(
        path = %info.path.display(),
        bytes = info.bytes,
        sha256 = %info.sha256,
        "Synthetic corpus ready"
    );
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::hash::fingerprint;
    use tempfile::TempDir;

    #[test]
    fn empty_workload_has_header_and_empty_colors() {
        let text = render(0, 0);
        assert_eq!(
            text,
            "name = \"Benchmark Monochrome\"\ntype = \"dark\"\n\n[colors]\n\n"
        );
        assert!(!text.contains("[[tokenColors]]"));
    }

    #[test]
    fn small_workload_layout() {
        let text = render(2, 1);
        let expected = "\
name = \"Benchmark Monochrome\"
type = \"dark\"

[colors]
color0 = \"#08bdba\"

[[tokenColors]]
name = \"token_0\"
scope = [\"scope.0\"]
settings = { foreground = \"#08bdba\" }
[[tokenColors]]
name = \"token_1\"
scope = [\"scope.1\"]
settings = { foreground = \"#33b1ff\" }
";
        assert_eq!(text, expected);
    }

    #[test]
    fn palette_cycles_every_ten() {
        assert_eq!(accent(0), "#08bdba");
        assert_eq!(accent(9), "#ff7eb6");
        assert_eq!(accent(10), "#08bdba");
        assert_eq!(accent(23), accent(3));

        let text = render(0, 12);
        assert!(text.contains("color10 = \"#08bdba\"\n"));
        assert!(text.contains("color11 = \"#33b1ff\"\n"));
    }

    #[test]
    fn counts_match_parameters() {
        let text = render(37, 21);
        let color_lines = text.lines().filter(|l| l.starts_with("color")).count();
        let records = text.matches("[[tokenColors]]").count();
        assert_eq!(color_lines, 21);
        assert_eq!(records, 37);
    }

    #[test]
    fn generate_writes_same_bytes_as_render() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(CORPUS_FILE_NAME);

        let info = generate(&path, 25, 13).expect("generate");
        let on_disk = std::fs::read(&path).expect("read corpus");

        assert_eq!(on_disk, render(25, 13).into_bytes());
        assert_eq!(info.bytes, on_disk.len() as u64);
        assert_eq!(info.sha256, fingerprint(&on_disk));
        assert_eq!(info.tokens, 25);
        assert_eq!(info.color_keys, 13);
    }

    #[test]
    fn generate_is_deterministic_and_truncates() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join(CORPUS_FILE_NAME);

        let big = generate(&path, 100, 100).expect("first");
        let first = generate(&path, 5, 5).expect("second");
        let second = generate(&path, 5, 5).expect("third");

        assert!(big.bytes > first.bytes);
        assert_eq!(first.sha256, second.sha256);
        assert_eq!(
            std::fs::read(&path).expect("read").len() as u64,
            second.bytes
        );
    }

    #[test]
    fn generate_into_missing_directory_is_an_io_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("no-such-dir").join(CORPUS_FILE_NAME);

        let err = generate(&path, 1, 1).expect_err("must fail");
        assert!(err.to_string().contains("writing corpus"));
    }
}
