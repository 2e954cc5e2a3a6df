//! Scratch directory holding the synthetic corpus.
//!
//! `ScratchDir` owns a `tempfile::TempDir`; dropping it removes the directory
//! recursively, which covers normal completion, `?` propagation and the
//! interrupt path alike. Preservation is an explicit final step.

use crate::error::{BenchError, Result};
use crate::util::interrupt::InterruptFlag;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use tracing::{debug, warn};

/// How often the acknowledgment wait looks at the interrupt flag.
const ACK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Prefix of every scratch directory created by the harness.
pub const SCRATCH_PREFIX: &str = "oxocarbon-neon.";

pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn create() -> Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a fresh directory under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn create_in(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| {
                BenchError::io_at(format!("creating scratch dir in {}", parent.display()), e)
            })?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "Created scratch directory");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Remove the directory now, surfacing teardown errors.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if recursive removal fails.
    pub fn release(mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            dir.close().map_err(|e| {
                BenchError::io_at(format!("removing scratch dir {}", self.path.display()), e)
            })?;
            debug!(path = %self.path.display(), "Removed scratch directory");
        }
        Ok(())
    }

    /// Keep the directory until a line arrives on `ack`, then release it.
    ///
    /// `announce` receives the path before waiting. The line is read on a
    /// helper thread so a raised `interrupt` ends the wait; the directory is
    /// then removed on drop.
    ///
    /// # Errors
    ///
    /// Returns `Interrupted` if the flag is raised while waiting, or an I/O
    /// error if reading `ack` or removing the directory fails.
    pub fn keep_until_acknowledged<R>(
        self,
        mut ack: R,
        interrupt: &InterruptFlag,
        announce: impl FnOnce(&Path),
    ) -> Result<()>
    where
        R: BufRead + Send + 'static,
    {
        announce(&self.path);

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut line = String::new();
            let _ = tx.send(ack.read_line(&mut line).map(|_| ()));
        });

        loop {
            interrupt.check()?;
            match rx.recv_timeout(ACK_POLL_INTERVAL) {
                Ok(read) => {
                    read?;
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.release()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!(path = %self.path.display(), error = %e, "Failed to remove scratch directory");
            }
        }
    }
}
