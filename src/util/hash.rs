//! SHA256 fingerprints for generated corpora.
//!
//! The corpus is hashed while it is written so reproducibility can be checked
//! across runs without re-reading a multi-megabyte file.

use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// Writer adapter that feeds every byte written through a SHA256 hasher.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    written: u64,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            written: 0,
        }
    }

    /// Consume the adapter, returning the inner writer, byte count and hex digest.
    pub fn finish(self) -> (W, u64, String) {
        (self.inner, self.written, format!("{:x}", self.hasher.finalize()))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Hex SHA256 of a byte slice.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
