//! Shared utilities for `benchneon`.
//!
//! - Content fingerprinting (SHA256) while writing
//! - Ctrl-C flag polled by the runner
//! - Progress indicators (spinner for generation, bar per variant)
//! - Self-removing scratch directory

pub mod hash;
pub mod interrupt;
pub mod progress;
pub mod scratch;

pub use hash::{HashingWriter, fingerprint};
pub use interrupt::InterruptFlag;
pub use scratch::ScratchDir;
