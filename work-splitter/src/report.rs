//! Per-run diagnostics: what happened to every catalog entry.

use crate::error::Result;
use crate::segmenter::ParserState;
use crate::sink::SinkSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Final status of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WorkStatus {
    /// The title line never appeared where it was expected
    Unmatched,
    /// Matched, but the entry is not retained
    Discarded { lines_dropped: usize },
    /// Matched and written out
    Saved {
        /// Lines written, including the title line
        lines_written: usize,
        /// Preamble lines dropped before the start-of-content marker
        preamble_discarded: usize,
        /// Start-of-content markers seen in the preamble window
        preamble_markers: usize,
        /// Several markers were present, so the cut point needs a human look
        ambiguous_preamble: bool,
        sink: SinkSummary,
    },
}

/// One catalog entry and what became of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOutcome {
    /// Position in the catalog
    pub index: usize,
    pub title: String,
    pub output_id: String,
    pub retain: bool,
    #[serde(flatten)]
    pub status: WorkStatus,
}

impl WorkOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, WorkStatus::Saved { .. })
    }

    pub fn is_unmatched(&self) -> bool {
        self.status == WorkStatus::Unmatched
    }
}

/// Summary of a whole segmentation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    pub generated_at: DateTime<Utc>,
    /// Input path, when the pass read from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// State the parser was in when input ran out
    pub final_state: ParserState,
    pub lines_read: usize,
    /// Number of works written to a sink
    pub saved: usize,
    /// One entry per catalog entry, in catalog order
    pub works: Vec<WorkOutcome>,
}

impl SplitReport {
    pub fn unmatched(&self) -> impl Iterator<Item = &WorkOutcome> {
        self.works.iter().filter(|w| w.is_unmatched())
    }

    pub fn saved_works(&self) -> impl Iterator<Item = &WorkOutcome> {
        self.works.iter().filter(|w| w.is_saved())
    }

    /// Saved works whose preamble cut was picked among several markers.
    pub fn ambiguous(&self) -> impl Iterator<Item = &WorkOutcome> {
        self.works.iter().filter(|w| {
            matches!(
                w.status,
                WorkStatus::Saved {
                    ambiguous_preamble: true,
                    ..
                }
            )
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
