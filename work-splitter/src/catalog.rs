//! The ordered catalog of expected works.
//!
//! The catalog is the only source of truth for where one work ends and the next
//! begins. It is fixed before a run starts and never derived from the input.

use crate::error::{Result, SplitError};
use crate::normalize::normalize_title;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One expected work, identified by its position in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Title as written in the catalog, for display
    pub title: String,
    /// Comparison key produced by [`normalize_title`]
    pub normalized_title: String,
    /// Whether matched content is written to a sink or dropped
    pub retain: bool,
    /// Stem of the output this work is written to
    pub output_id: String,
}

impl CatalogEntry {
    /// Create an entry, computing its comparison key from the raw title.
    pub fn new(title: impl Into<String>, retain: bool, output_id: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            normalized_title: normalize_title(&title),
            title,
            retain,
            output_id: output_id.into(),
        }
    }
}

/// A work as it appears in a catalog TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSpec {
    pub title: String,
    #[serde(default = "default_retain")]
    pub retain: bool,
    pub output: String,
}

fn default_retain() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    works: Vec<WorkSpec>,
}

/// Ordered, validated, immutable list of catalog entries.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting anything the segmenter could not use.
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(SplitError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for (index, entry) in entries.iter().enumerate() {
            if entry.normalized_title.is_empty() {
                return Err(SplitError::EmptyTitle { index });
            }
            if !is_valid_output_id(&entry.output_id) {
                return Err(SplitError::InvalidOutputId {
                    id: entry.output_id.clone(),
                });
            }
            if entry.retain && !seen.insert(entry.output_id.as_str()) {
                return Err(SplitError::DuplicateOutputId {
                    id: entry.output_id.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Build a catalog from file-level work descriptions.
    pub fn from_works(works: Vec<WorkSpec>) -> Result<Self> {
        Self::new(
            works
                .into_iter()
                .map(|w| CatalogEntry::new(w.title, w.retain, w.output))
                .collect(),
        )
    }

    /// Parse a catalog from TOML text containing `[[works]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_works(file.works)
    }

    /// Load a catalog TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render the catalog as TOML that [`Catalog::from_toml_str`] accepts.
    pub fn to_toml_string(&self) -> Result<String> {
        let file = CatalogFile {
            works: self
                .entries
                .iter()
                .map(|e| WorkSpec {
                    title: e.title.clone(),
                    retain: e.retain,
                    output: e.output_id.clone(),
                })
                .collect(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Write the catalog to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key of the last entry, which closes the table of contents.
    pub fn terminator(&self) -> &str {
        // Non-empty by construction.
        &self.entries[self.entries.len() - 1].normalized_title
    }

    pub fn retained_count(&self) -> usize {
        self.entries.iter().filter(|e| e.retain).count()
    }

    /// The Project Gutenberg "Complete Works of William Shakespeare" (PG100)
    /// in table-of-contents order. Plays are kept; the sonnets and the long
    /// poems are dropped.
    pub fn pg100() -> Self {
        let entries = PG100_WORKS
            .iter()
            .map(|(title, retain, output)| CatalogEntry::new(*title, *retain, *output))
            .collect();
        Self { entries }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::pg100()
    }
}

fn is_valid_output_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

const PG100_WORKS: &[(&str, bool, &str)] = &[
    ("THE SONNETS", false, "the_sonnets"),
    ("ALL'S WELL THAT ENDS WELL", true, "alls_well_that_ends_well"),
    ("THE TRAGEDY OF ANTONY AND CLEOPATRA", true, "antony_and_cleopatra"),
    ("AS YOU LIKE IT", true, "as_you_like_it"),
    ("THE COMEDY OF ERRORS", true, "the_comedy_of_errors"),
    ("THE TRAGEDY OF CORIOLANUS", true, "coriolanus"),
    ("CYMBELINE", true, "cymbeline"),
    ("THE TRAGEDY OF HAMLET, PRINCE OF DENMARK", true, "hamlet"),
    ("THE FIRST PART OF KING HENRY THE FOURTH", true, "king_henry_iv_part_1"),
    ("THE SECOND PART OF KING HENRY THE FOURTH", true, "king_henry_iv_part_2"),
    ("THE LIFE OF KING HENRY THE FIFTH", true, "king_henry_v"),
    ("THE FIRST PART OF HENRY THE SIXTH", true, "king_henry_vi_part_1"),
    ("THE SECOND PART OF KING HENRY THE SIXTH", true, "king_henry_vi_part_2"),
    ("THE THIRD PART OF KING HENRY THE SIXTH", true, "king_henry_vi_part_3"),
    ("KING HENRY THE EIGHTH", true, "king_henry_viii"),
    ("THE LIFE AND DEATH OF KING JOHN", true, "king_john"),
    ("THE TRAGEDY OF JULIUS CAESAR", true, "julius_caesar"),
    ("THE TRAGEDY OF KING LEAR", true, "king_lear"),
    ("LOVE'S LABOUR'S LOST", true, "loves_labours_lost"),
    ("THE TRAGEDY OF MACBETH", true, "macbeth"),
    ("MEASURE FOR MEASURE", true, "measure_for_measure"),
    ("THE MERCHANT OF VENICE", true, "the_merchant_of_venice"),
    ("THE MERRY WIVES OF WINDSOR", true, "the_merry_wives_of_windsor"),
    ("A MIDSUMMER NIGHT'S DREAM", true, "a_midsummer_nights_dream"),
    ("MUCH ADO ABOUT NOTHING", true, "much_ado_about_nothing"),
    ("THE TRAGEDY OF OTHELLO, THE MOOR OF VENICE", true, "othello"),
    ("PERICLES, PRINCE OF TYRE", true, "pericles"),
    ("KING RICHARD THE SECOND", true, "king_richard_ii"),
    ("KING RICHARD THE THIRD", true, "king_richard_iii"),
    ("THE TRAGEDY OF ROMEO AND JULIET", true, "romeo_and_juliet"),
    ("THE TAMING OF THE SHREW", true, "the_taming_of_the_shrew"),
    ("THE TEMPEST", true, "the_tempest"),
    ("THE LIFE OF TIMON OF ATHENS", true, "timon_of_athens"),
    ("THE TRAGEDY OF TITUS ANDRONICUS", true, "titus_andronicus"),
    ("TROILUS AND CRESSIDA", true, "troilus_and_cressida"),
    ("TWELFTH NIGHT; OR, WHAT YOU WILL", true, "twelfth_night"),
    ("THE TWO GENTLEMEN OF VERONA", true, "the_two_gentlemen_of_verona"),
    ("THE TWO NOBLE KINSMEN", true, "the_two_noble_kinsmen"),
    ("THE WINTER'S TALE", true, "the_winters_tale"),
    ("A LOVER'S COMPLAINT", false, "a_lovers_complaint"),
    ("THE PASSIONATE PILGRIM", false, "the_passionate_pilgrim"),
    ("THE PHOENIX AND THE TURTLE", false, "the_phoenix_and_the_turtle"),
    ("THE RAPE OF LUCRECE", false, "the_rape_of_lucrece"),
    ("VENUS AND ADONIS", false, "venus_and_adonis"),
];
