//! Single-pass segmentation of an anthology into one output per work.
//!
//! The segmenter walks the input once, line by line, through three states:
//! it waits for the table-of-contents header, skips the table of contents up
//! to the catalog's last title, then extracts works by matching each catalog
//! title in order. Memory use is bounded by the body buffer and the preamble
//! window regardless of input size.

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::{Result, SplitError};
use crate::matcher::BoundaryMatcher;
use crate::normalize::normalize_title;
use crate::preamble::{trim_into, PreambleCut};
use crate::report::{SplitReport, WorkOutcome, WorkStatus};
use crate::sink::{DirectorySinks, SinkProvider};
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

/// Default number of buffered body lines before a flush.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 1000;

/// Default number of lines kept while looking for the start of content.
pub const DEFAULT_PREAMBLE_LIMIT: usize = 1000;

/// Substring that marks the table-of-contents header.
pub const DEFAULT_HEADER_MARKER: &str = "Contents";

/// Tuning knobs for a segmentation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterOptions {
    /// Body lines buffered before they are written to the active sink
    pub flush_threshold: usize,
    /// Preamble lines captured before trimming is forced
    pub preamble_limit: usize,
    /// Case-sensitive substring that opens the table of contents
    pub header_marker: String,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            preamble_limit: DEFAULT_PREAMBLE_LIMIT,
            header_marker: DEFAULT_HEADER_MARKER.to_string(),
        }
    }
}

/// Where the parser is in the input. States are only ever entered in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserState {
    AwaitingCatalogHeader,
    SkippingCatalogBody,
    Extracting,
}

/// The retained work currently being written.
struct ActiveWork<'a, S: Write> {
    index: usize,
    entry: &'a CatalogEntry,
    sink: S,
    in_preamble: bool,
    preamble: Vec<String>,
    cut: Option<PreambleCut>,
    lines_written: usize,
}

impl<S: Write> ActiveWork<'_, S> {
    /// Trim the preamble window and move what is left into the body buffer.
    fn resolve_preamble(&mut self, body: &mut Vec<String>) {
        let cut = trim_into(&mut self.preamble, body);
        if cut.start > 0 {
            debug!(
                "{}: discarded {} preamble line(s)",
                self.entry.output_id, cut.start
            );
        }
        self.cut = Some(cut);
        self.in_preamble = false;
    }

    fn flush(&mut self, body: &mut Vec<String>) -> io::Result<()> {
        for line in body.drain(..) {
            self.sink.write_all(line.as_bytes())?;
            self.lines_written += 1;
        }
        Ok(())
    }
}

/// Streaming splitter driven one line at a time.
pub struct Segmenter<'a, P: SinkProvider> {
    catalog: &'a Catalog,
    options: SegmenterOptions,
    sinks: &'a mut P,
    state: ParserState,
    matcher: BoundaryMatcher<'a>,
    active: Option<ActiveWork<'a, P::Sink>>,
    /// Catalog index of a matched entry that is not retained
    discarding: Option<usize>,
    body: Vec<String>,
    outcomes: Vec<WorkOutcome>,
    lines_read: usize,
    saved: usize,
}

impl<'a, P: SinkProvider> Segmenter<'a, P> {
    pub fn new(catalog: &'a Catalog, options: SegmenterOptions, sinks: &'a mut P) -> Self {
        let outcomes = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| WorkOutcome {
                index,
                title: entry.title.clone(),
                output_id: entry.output_id.clone(),
                retain: entry.retain,
                status: WorkStatus::Unmatched,
            })
            .collect();

        Self {
            catalog,
            // A zero bound would never be reached after a push.
            options: SegmenterOptions {
                flush_threshold: options.flush_threshold.max(1),
                preamble_limit: options.preamble_limit.max(1),
                ..options
            },
            sinks,
            state: ParserState::AwaitingCatalogHeader,
            matcher: BoundaryMatcher::new(catalog),
            active: None,
            discarding: None,
            body: Vec::new(),
            outcomes,
            lines_read: 0,
            saved: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Index of the next catalog entry waiting for its title line.
    pub fn cursor(&self) -> usize {
        self.matcher.cursor()
    }

    /// Feed one raw line, terminator included.
    ///
    /// Returns the outcome of a work that was closed by this line, if any.
    pub fn push_line(&mut self, raw: &str) -> Result<Option<WorkOutcome>> {
        self.lines_read += 1;
        let line = raw.trim();

        match self.state {
            ParserState::AwaitingCatalogHeader => {
                if line.contains(self.options.header_marker.as_str()) {
                    debug!("Table of contents header at line {}", self.lines_read);
                    self.state = ParserState::SkippingCatalogBody;
                }
                Ok(None)
            }
            ParserState::SkippingCatalogBody => {
                if normalize_title(line) == self.catalog.terminator() {
                    debug!("Table of contents ends at line {}", self.lines_read);
                    self.state = ParserState::Extracting;
                }
                Ok(None)
            }
            ParserState::Extracting => self.extract(raw, line),
        }
    }

    fn extract(&mut self, raw: &str, line: &str) -> Result<Option<WorkOutcome>> {
        if let Some((index, entry)) = self.matcher.advance_on(line) {
            debug!(
                "Line {}: boundary for '{}' ({})",
                self.lines_read, entry.title, entry.output_id
            );
            let closed = self.close_active()?;
            self.open(index, entry, raw)?;
            return Ok(closed);
        }

        match self.active.as_mut() {
            Some(work) if work.in_preamble => {
                work.preamble.push(raw.to_string());
                if work.preamble.len() >= self.options.preamble_limit {
                    work.resolve_preamble(&mut self.body);
                    if self.body.len() >= self.options.flush_threshold {
                        work.flush(&mut self.body)?;
                    }
                }
            }
            Some(work) => {
                self.body.push(raw.to_string());
                if self.body.len() >= self.options.flush_threshold {
                    work.flush(&mut self.body)?;
                }
            }
            None => {
                if let Some(index) = self.discarding {
                    if let WorkStatus::Discarded { lines_dropped } = &mut self.outcomes[index].status
                    {
                        *lines_dropped += 1;
                    }
                }
            }
        }
        Ok(None)
    }

    fn open(&mut self, index: usize, entry: &'a CatalogEntry, raw: &str) -> Result<()> {
        self.discarding = None;

        if !entry.retain {
            self.outcomes[index].status = WorkStatus::Discarded { lines_dropped: 0 };
            self.discarding = Some(index);
            return Ok(());
        }

        let mut sink = self.sinks.open(entry)?;
        sink.write_all(raw.as_bytes())?;
        self.active = Some(ActiveWork {
            index,
            entry,
            sink,
            in_preamble: true,
            preamble: Vec::new(),
            cut: None,
            lines_written: 1,
        });
        Ok(())
    }

    /// Finish the active work, if there is one: trim, flush, close.
    fn close_active(&mut self) -> Result<Option<WorkOutcome>> {
        let Some(mut work) = self.active.take() else {
            return Ok(None);
        };

        if work.in_preamble {
            work.resolve_preamble(&mut self.body);
        }
        work.flush(&mut self.body)?;

        let cut = work.cut.unwrap_or(PreambleCut {
            start: 0,
            markers: 0,
        });
        let sink = self.sinks.finish(work.entry, work.sink)?;
        info!("Saved: {}", sink.location);
        if cut.is_ambiguous() {
            warn!(
                "{}: {} start-of-content markers in preamble, kept from line {} of the window; review manually",
                work.entry.output_id,
                cut.markers,
                cut.start + 1
            );
        }
        self.saved += 1;

        let outcome = &mut self.outcomes[work.index];
        outcome.status = WorkStatus::Saved {
            lines_written: work.lines_written,
            preamble_discarded: cut.start,
            preamble_markers: cut.markers,
            ambiguous_preamble: cut.is_ambiguous(),
            sink,
        };
        Ok(Some(outcome.clone()))
    }

    fn consume<R: BufRead, F: FnMut(&WorkOutcome)>(
        &mut self,
        mut reader: R,
        on_saved: &mut F,
    ) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(());
            }
            if let Some(saved) = self.push_line(&line)? {
                on_saved(&saved);
            }
        }
    }

    /// Throw away the active work after a failure.
    fn abandon_active(&mut self) {
        self.body.clear();
        let Some(work) = self.active.take() else {
            return;
        };
        warn!(
            "Input failed while writing {}; removing partial output",
            work.entry.output_id
        );
        if let Err(e) = self.sinks.abandon(work.entry, work.sink) {
            warn!("Could not remove partial output {}: {}", work.entry.output_id, e);
        }
    }

    /// Close any open work and report on the pass.
    pub fn finish(mut self) -> Result<SplitReport> {
        self.close_active()?;
        Ok(self.into_report())
    }

    fn into_report(self) -> SplitReport {
        match self.state {
            ParserState::AwaitingCatalogHeader => warn!(
                "Table of contents header '{}' never found; nothing was extracted",
                self.options.header_marker
            ),
            ParserState::SkippingCatalogBody => warn!(
                "Table of contents never ended (no line matching '{}'); nothing was extracted",
                self.catalog.terminator()
            ),
            ParserState::Extracting => {
                let missing: Vec<&str> = self
                    .outcomes
                    .iter()
                    .filter(|w| w.is_unmatched())
                    .map(|w| w.output_id.as_str())
                    .collect();
                if !missing.is_empty() {
                    warn!(
                        "{} catalog entr{} never matched: {}",
                        missing.len(),
                        if missing.len() == 1 { "y" } else { "ies" },
                        missing.join(", ")
                    );
                }
            }
        }

        SplitReport {
            generated_at: Utc::now(),
            input: None,
            final_state: self.state,
            lines_read: self.lines_read,
            saved: self.saved,
            works: self.outcomes,
        }
    }
}

/// Split everything `reader` yields, calling `on_saved` after each work is closed.
///
/// If reading fails partway through, the work being written is abandoned so
/// no truncated output is left behind. Works already closed are kept.
pub fn split_reader<R, P, F>(
    reader: R,
    catalog: &Catalog,
    options: SegmenterOptions,
    sinks: &mut P,
    mut on_saved: F,
) -> Result<SplitReport>
where
    R: BufRead,
    P: SinkProvider,
    F: FnMut(&WorkOutcome),
{
    let mut segmenter = Segmenter::new(catalog, options, sinks);

    if let Err(e) = segmenter.consume(reader, &mut on_saved) {
        segmenter.abandon_active();
        return Err(e);
    }

    if let Some(saved) = segmenter.close_active()? {
        on_saved(&saved);
    }
    Ok(segmenter.into_report())
}

/// Split a file on disk into `<output_dir>/<output_id>.txt` files.
///
/// A missing input is reported before the output directory is created. A read
/// error later on removes the file of the work in progress; files of works
/// closed before the error stay on disk.
pub fn split_file<F>(
    input: &Path,
    output_dir: &Path,
    catalog: &Catalog,
    options: SegmenterOptions,
    on_saved: F,
) -> Result<SplitReport>
where
    F: FnMut(&WorkOutcome),
{
    if !input.is_file() {
        return Err(SplitError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    let reader = BufReader::new(File::open(input)?);
    let mut sinks = DirectorySinks::create(output_dir)?;

    info!(
        "Streaming and splitting '{}' by strict sequence...",
        input.display()
    );
    let mut report = split_reader(reader, catalog, options, &mut sinks, on_saved)?;
    report.input = Some(input.display().to_string());
    Ok(report)
}
