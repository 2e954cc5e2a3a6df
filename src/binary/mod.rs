//! Locating (or producing) the binary under test.
//!
//! Resolution order, first match wins:
//! 1. An explicit `--bin` path, which must be an executable file.
//! 2. The conventional cargo artifact, `<root>/target/<profile-dir>/<name>`.
//! 3. A fresh build through a [`Builder`], unless building is disabled.
//!
//! Resolution runs once per harness invocation; both variants execute the
//! returned path.

use crate::error::{BenchError, Result};
use crate::model::Profile;
use crate::util::interrupt::InterruptFlag;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// Default name of the program under test.
pub const DEFAULT_BINARY_NAME: &str = "oxocarbon-themec";

/// External build step.
///
/// Any `Fn(&Path, Profile) -> Result<()>` closure is a `Builder`.
pub trait Builder {
    /// Build the crate described by `manifest` with `profile`.
    ///
    /// # Errors
    ///
    /// Returns `BuildFailed` when the build exits unsuccessfully, or an I/O
    /// error when it cannot be started.
    fn build(&self, manifest: &Path, profile: Profile) -> Result<()>;
}

impl<F> Builder for F
where
    F: Fn(&Path, Profile) -> Result<()>,
{
    fn build(&self, manifest: &Path, profile: Profile) -> Result<()> {
        self(manifest, profile)
    }
}

/// Builds with `cargo build --manifest-path <manifest> --profile <profile>`.
#[derive(Debug, Clone)]
pub struct CargoBuilder {
    program: OsString,
    interrupt: Option<InterruptFlag>,
}

impl Default for CargoBuilder {
    fn default() -> Self {
        Self::new("cargo")
    }
}

impl CargoBuilder {
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            interrupt: None,
        }
    }

    /// Report a build cut short by Ctrl-C as `Interrupted`.
    #[must_use]
    pub fn interrupt(mut self, flag: &InterruptFlag) -> Self {
        self.interrupt = Some(flag.clone());
        self
    }

    fn was_interrupted(&self, status: ExitStatus) -> bool {
        if self.interrupt.as_ref().is_some_and(InterruptFlag::is_set) {
            return true;
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            // SIGINT reaches the whole foreground process group, cargo included.
            const SIGINT: i32 = 2;
            if status.signal() == Some(SIGINT) {
                return true;
            }
        }
        #[cfg(not(unix))]
        let _ = status;
        false
    }
}

impl Builder for CargoBuilder {
    fn build(&self, manifest: &Path, profile: Profile) -> Result<()> {
        info!(
            manifest = %manifest.display(),
            profile = %profile,
            "Building benchmark binary"
        );

        // Build chatter goes to stderr; stdout is reserved for the report.
        let status = Command::new(&self.program)
            .arg("build")
            .arg("--manifest-path")
            .arg(manifest)
            .arg("--profile")
            .arg(profile.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                BenchError::io_at(
                    format!("starting {}", Path::new(&self.program).display()),
                    e,
                )
            })?;

        if status.success() {
            Ok(())
        } else if self.was_interrupted(status) {
            Err(BenchError::Interrupted)
        } else {
            Err(BenchError::BuildFailed {
                manifest: manifest.to_path_buf(),
                code: status.code(),
            })
        }
    }
}

/// Check that `path` is a regular file the current user may execute.
///
/// # Errors
///
/// Returns a human-readable reason when the check fails.
pub fn check_executable(path: &Path) -> std::result::Result<(), String> {
    let metadata = std::fs::metadata(path).map_err(|e| e.to_string())?;
    if !metadata.is_file() {
        return Err("not a regular file".to_string());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err("missing execute permission".to_string());
        }
    }

    Ok(())
}

/// Resolves the binary for one project root and profile.
pub struct BinaryResolver<'a, B: Builder + ?Sized> {
    root: &'a Path,
    profile: Profile,
    binary_name: &'a str,
    builder: &'a B,
}

impl<'a, B: Builder + ?Sized> BinaryResolver<'a, B> {
    pub fn new(root: &'a Path, profile: Profile, binary_name: &'a str, builder: &'a B) -> Self {
        Self {
            root,
            profile,
            binary_name,
            builder,
        }
    }

    /// Where cargo leaves the artifact for this profile.
    #[must_use]
    pub fn conventional_path(&self) -> PathBuf {
        self.root
            .join("target")
            .join(self.profile.target_dir())
            .join(self.binary_name)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("Cargo.toml")
    }

    /// Produce an executable path, building if allowed and necessary.
    ///
    /// # Errors
    ///
    /// - `InvalidBinary` if `explicit` is given but unusable
    /// - `BinaryMissing` if nothing is built and `allow_build` is false
    /// - `BuildFailed` / `BuildArtifactMissing` from the build step
    pub fn resolve(&self, explicit: Option<&Path>, allow_build: bool) -> Result<PathBuf> {
        if let Some(path) = explicit {
            // A bare name would otherwise be looked up on the child's PATH.
            let path = std::path::absolute(path).map_err(|e| BenchError::InvalidBinary {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            check_executable(&path).map_err(|reason| BenchError::InvalidBinary {
                path: path.clone(),
                reason,
            })?;
            debug!(path = %path.display(), "Using explicit binary");
            return Ok(path);
        }

        let target = self.conventional_path();
        if check_executable(&target).is_ok() {
            debug!(path = %target.display(), "Reusing existing build artifact");
            return Ok(target);
        }

        if !allow_build {
            return Err(BenchError::BinaryMissing { path: target });
        }

        self.builder.build(&self.manifest_path(), self.profile)?;

        if target.is_file() {
            info!(path = %target.display(), "Build produced benchmark binary");
            Ok(target)
        } else {
            Err(BenchError::BuildArtifactMissing { path: target })
        }
    }
}
