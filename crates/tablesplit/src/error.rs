//! Error types shared by the table I/O adapter and the split/merge workflows

use std::path::PathBuf;
use thiserror::Error;

/// Reason a table could not be used for a split or merge
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// The file extension is neither of the supported formats
    #[error("file with extension '{0}' cannot be read")]
    UnreadableExtension(String),
    /// The requested column is not part of the table header
    #[error("column '{0}' does not exist")]
    MissingColumn(String),
}

/// Errors produced by table reading, writing, splitting and merging
#[derive(Debug, Error)]
pub enum TableError {
    /// Source file or directory does not exist
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Extension outside the supported formats
    #[error("unsupported file extension: '{0}'")]
    UnsupportedFormat(String),

    /// Table is absent or lacks the split column
    #[error("table does not exist: {0}")]
    TableLoad(LoadFailure),

    /// No output folder name can be derived from the source path
    #[error("cannot derive an output folder name from '{0}'")]
    InvalidSourceName(String),

    /// A row does not have one cell per header column
    #[error("row {row} has {found} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Tables being concatenated do not share the same header
    #[error("column mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Merge source directory holds no entries
    #[error("no tables to merge in {}", .0.display())]
    NothingToMerge(PathBuf),

    /// Table does not fit on a single worksheet
    #[error("table of {rows} rows and {columns} columns does not fit on a worksheet")]
    SheetTooLarge { rows: usize, columns: usize },

    /// Delimited text parse or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet read error
    #[error("spreadsheet read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// Spreadsheet write error
    #[error("spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LoadFailure> for TableError {
    fn from(failure: LoadFailure) -> Self {
        Self::TableLoad(failure)
    }
}
