//! Output sinks: where retained works are written.

mod directory;
mod memory;

pub use directory::DirectorySinks;
pub use memory::MemorySinks;

use crate::catalog::CatalogEntry;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// Opens and closes one output per retained work.
///
/// The segmenter holds at most one sink at a time and hands it back through
/// [`SinkProvider::finish`] before opening the next one.
pub trait SinkProvider {
    type Sink: Write;

    /// Open the output for a work that has just been matched.
    fn open(&mut self, entry: &CatalogEntry) -> Result<Self::Sink>;

    /// Flush and close a sink. The output must be durable when this returns.
    fn finish(&mut self, entry: &CatalogEntry, sink: Self::Sink) -> Result<SinkSummary>;

    /// Drop a sink whose work was cut short, leaving no partial output behind.
    fn abandon(&mut self, entry: &CatalogEntry, sink: Self::Sink) -> Result<()>;
}

/// What a closed sink ended up holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSummary {
    /// File path or other identifier of the written output
    pub location: String,
    pub bytes: u64,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
}

/// Writer adapter that counts and hashes everything passing through it.
pub struct HashingWriter<W: Write> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
        }
    }

    /// Split into the wrapped writer, byte count and hex digest.
    pub fn into_parts(self) -> (W, u64, String) {
        let digest = format!("{:x}", self.hasher.finalize());
        (self.inner, self.bytes, digest)
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        self.bytes += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
