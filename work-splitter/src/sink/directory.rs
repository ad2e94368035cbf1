//! One text file per work inside an output directory.

use super::{HashingWriter, SinkProvider, SinkSummary};
use crate::catalog::CatalogEntry;
use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes each retained work to `<dir>/<output_id>.txt`.
#[derive(Debug)]
pub struct DirectorySinks {
    dir: PathBuf,
}

impl DirectorySinks {
    /// Use `dir` for output, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a work with this output id is written to.
    pub fn path_for(&self, output_id: &str) -> PathBuf {
        self.dir.join(format!("{output_id}.txt"))
    }
}

impl SinkProvider for DirectorySinks {
    type Sink = HashingWriter<BufWriter<File>>;

    fn open(&mut self, entry: &CatalogEntry) -> Result<Self::Sink> {
        let file = File::create(self.path_for(&entry.output_id))?;
        Ok(HashingWriter::new(BufWriter::new(file)))
    }

    fn finish(&mut self, entry: &CatalogEntry, mut sink: Self::Sink) -> Result<SinkSummary> {
        sink.flush()?;
        let (writer, bytes, sha256) = sink.into_parts();
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        Ok(SinkSummary {
            location: self.path_for(&entry.output_id).display().to_string(),
            bytes,
            sha256,
        })
    }

    fn abandon(&mut self, entry: &CatalogEntry, sink: Self::Sink) -> Result<()> {
        // Close the handle before removing the file.
        drop(sink);
        let path = self.path_for(&entry.output_id);
        match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested").join("out");
        let sinks = DirectorySinks::create(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(sinks.dir(), dir.as_path());
    }

    #[test]
    fn test_writes_named_file() {
        let temp = TempDir::new().unwrap();
        let mut sinks = DirectorySinks::create(temp.path()).unwrap();
        let entry = CatalogEntry::new("THE TEMPEST", true, "the_tempest");

        let mut sink = sinks.open(&entry).unwrap();
        sink.write_all(b"THE TEMPEST\nACT I\n").unwrap();
        let summary = sinks.finish(&entry, sink).unwrap();

        let path = temp.path().join("the_tempest.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), "THE TEMPEST\nACT I\n");
        assert_eq!(summary.bytes, 18);
        assert_eq!(summary.location, path.display().to_string());
        assert_eq!(summary.sha256.len(), 64);
    }

    #[test]
    fn test_abandon_removes_partial_file() {
        let temp = TempDir::new().unwrap();
        let mut sinks = DirectorySinks::create(temp.path()).unwrap();
        let entry = CatalogEntry::new("THE TEMPEST", true, "the_tempest");

        let mut sink = sinks.open(&entry).unwrap();
        sink.write_all(b"THE TEMPEST\n").unwrap();
        sinks.abandon(&entry, sink).unwrap();

        assert!(!temp.path().join("the_tempest.txt").exists());
    }
}
