//! Strict in-order boundary matching against the catalog.

use crate::catalog::{Catalog, CatalogEntry};
use crate::normalize::{is_all_uppercase, normalize_title};

/// Outcome of comparing one line with the next expected title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMatch {
    Matched,
    NotMatched,
}

/// Tracks the next unmatched catalog entry.
///
/// The cursor only moves forward, one entry per match. There is no lookahead:
/// if the expected title never shows up, later titles can never match either.
#[derive(Debug)]
pub struct BoundaryMatcher<'a> {
    catalog: &'a Catalog,
    cursor: usize,
}

impl<'a> BoundaryMatcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog, cursor: 0 }
    }

    /// Index of the next entry waiting for its title line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The entry a boundary line would currently open.
    pub fn expected(&self) -> Option<&'a CatalogEntry> {
        self.catalog.get(self.cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.catalog.len()
    }

    /// Compare a trimmed line with the expected entry without moving the cursor.
    pub fn check(&self, line: &str) -> BoundaryMatch {
        let Some(expected) = self.expected() else {
            return BoundaryMatch::NotMatched;
        };
        if !is_all_uppercase(line) {
            return BoundaryMatch::NotMatched;
        }
        if normalize_title(line) == expected.normalized_title {
            BoundaryMatch::Matched
        } else {
            BoundaryMatch::NotMatched
        }
    }

    /// On a match, consume the expected entry and return it with its index.
    pub fn advance_on(&mut self, line: &str) -> Option<(usize, &'a CatalogEntry)> {
        if self.check(line) == BoundaryMatch::NotMatched {
            return None;
        }
        let index = self.cursor;
        let entry = self.catalog.get(index)?;
        self.cursor += 1;
        Some((index, entry))
    }
}
