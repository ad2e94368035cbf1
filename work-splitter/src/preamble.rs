//! Discarding cast lists and other front matter that follows a work's title.

use regex::Regex;
use std::sync::OnceLock;

static START_MARKER: OnceLock<Regex> = OnceLock::new();

fn start_marker() -> &'static Regex {
    START_MARKER.get_or_init(|| {
        Regex::new(r"(?i)^(ACT\s+I|PROLOGUE|SCENE\s+I|INDUCTION)[.\s]*$")
            .expect("start-of-content pattern should compile")
    })
}

/// True when the line, trimmed, is one of the headings that open real content:
/// `ACT I`, `PROLOGUE`, `SCENE I` or `INDUCTION`, in any case, optionally
/// followed by periods.
pub fn is_start_marker(line: &str) -> bool {
    start_marker().is_match(line.trim())
}

/// Where content starts inside a preamble window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreambleCut {
    /// Index of the first kept line; everything before it is discarded
    pub start: usize,
    /// Number of marker lines seen in the window
    pub markers: usize,
}

impl PreambleCut {
    /// More than one marker means the cut point was a guess worth reviewing.
    pub fn is_ambiguous(&self) -> bool {
        self.markers > 1
    }
}

/// Locate the marker closest to the end of the window.
///
/// The scan runs backward so the latest marker wins: cast lists can contain
/// lines that look like markers, and the one nearest the body is taken as the
/// true start. Without any marker nothing is discarded.
pub fn find_content_start(window: &[String]) -> PreambleCut {
    let mut start = None;
    let mut markers = 0;
    for (i, line) in window.iter().enumerate().rev() {
        if is_start_marker(line) {
            markers += 1;
            start.get_or_insert(i);
        }
    }
    PreambleCut {
        start: start.unwrap_or(0),
        markers,
    }
}

/// Move the kept suffix of `window` onto the end of `body`, leaving `window` empty.
pub fn trim_into(window: &mut Vec<String>, body: &mut Vec<String>) -> PreambleCut {
    let cut = find_content_start(window);
    body.extend(window.drain(cut.start..));
    window.clear();
    cut
}
