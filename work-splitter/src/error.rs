use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Catalog is empty. At least one work is required to locate the end of the table of contents.")]
    EmptyCatalog,

    #[error("Catalog entry {index} has a title with no letters after normalization")]
    EmptyTitle { index: usize },

    #[error("Invalid output id '{id}'. Use ASCII letters, digits, '_', '-' or '.', not starting with '.'")]
    InvalidOutputId { id: String },

    #[error("Output id '{id}' is used by more than one retained work")]
    DuplicateOutputId { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("Catalog serialization error: {0}")]
    CatalogSerialize(#[from] toml::ser::Error),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SplitError>;
