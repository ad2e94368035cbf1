//! In-memory sinks, for tests and for callers that post-process output directly.

use super::{HashingWriter, SinkProvider, SinkSummary};
use crate::catalog::CatalogEntry;
use crate::error::Result;

/// Collects every finished output in the order it was opened.
#[derive(Debug, Default)]
pub struct MemorySinks {
    outputs: Vec<(String, Vec<u8>)>,
}

impl MemorySinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output ids in the order their sinks were opened.
    pub fn ids(&self) -> Vec<&str> {
        self.outputs.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn bytes(&self, output_id: &str) -> Option<&[u8]> {
        self.outputs
            .iter()
            .find(|(id, _)| id == output_id)
            .map(|(_, data)| data.as_slice())
    }

    pub fn text(&self, output_id: &str) -> Option<String> {
        self.bytes(output_id)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Lines of an output without their terminators.
    pub fn lines(&self, output_id: &str) -> Option<Vec<String>> {
        self.text(output_id)
            .map(|t| t.lines().map(str::to_string).collect())
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl SinkProvider for MemorySinks {
    type Sink = HashingWriter<Vec<u8>>;

    fn open(&mut self, _entry: &CatalogEntry) -> Result<Self::Sink> {
        Ok(HashingWriter::new(Vec::new()))
    }

    fn finish(&mut self, entry: &CatalogEntry, sink: Self::Sink) -> Result<SinkSummary> {
        let (data, bytes, sha256) = sink.into_parts();
        self.outputs.push((entry.output_id.clone(), data));
        Ok(SinkSummary {
            location: format!("memory:{}", entry.output_id),
            bytes,
            sha256,
        })
    }

    fn abandon(&mut self, _entry: &CatalogEntry, _sink: Self::Sink) -> Result<()> {
        Ok(())
    }
}
