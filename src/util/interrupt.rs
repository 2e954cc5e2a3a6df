//! Ctrl-C handling.
//!
//! The handler only raises a flag. The runner polls it between repetitions,
//! the build step consults it when cargo exits, and the `--keep-temp` prompt
//! polls it while waiting. Each unwinds with `BenchError::Interrupted`, so the
//! scratch directory guard still runs its cleanup.

use crate::error::{BenchError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Shared, cloneable interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag and route SIGINT/Ctrl-C into it.
    ///
    /// Only one handler may exist per process.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already installed or the OS refuses.
    pub fn install() -> Result<Self> {
        let flag = Self::new();
        let handler_flag = flag.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received, stopping");
            handler_flag.trigger();
        })
        .map_err(|e| BenchError::Other(anyhow::Error::new(e).context("installing Ctrl-C handler")))?;
        Ok(flag)
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once the flag has been raised.
    ///
    /// # Errors
    ///
    /// Returns `BenchError::Interrupted` if the flag is set.
    pub fn check(&self) -> Result<()> {
        if self.is_set() {
            Err(BenchError::Interrupted)
        } else {
            Ok(())
        }
    }
}
