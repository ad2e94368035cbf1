//! Split a concatenated anthology into one output per work.
//!
//! An ordered [`Catalog`] of expected titles is the only source of truth for
//! where works begin. The [`Segmenter`] makes a single streaming pass:
//! - skips the table of contents
//! - matches each catalog title in strict order
//! - drops cast lists and other front matter before the first act
//! - writes every retained work to its own sink

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod preamble;
pub mod report;
pub mod segmenter;
pub mod sink;

pub use catalog::{Catalog, CatalogEntry, WorkSpec};
pub use error::{Result, SplitError};
pub use matcher::{BoundaryMatch, BoundaryMatcher};
pub use normalize::{is_all_uppercase, normalize_title};
pub use preamble::{find_content_start, is_start_marker, PreambleCut};
pub use report::{SplitReport, WorkOutcome, WorkStatus};
pub use segmenter::{split_file, split_reader, ParserState, Segmenter, SegmenterOptions};
pub use sink::{DirectorySinks, MemorySinks, SinkProvider, SinkSummary};
