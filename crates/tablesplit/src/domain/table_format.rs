//! Supported table file formats
//!
//! A format is selected purely by file extension; no content sniffing is done.

use crate::constants::{CSV_EXTENSION, XLSX_EXTENSION};

/// Table file format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableFormat {
    /// Single-sheet spreadsheet, first row is the header
    Xlsx,
    /// Comma-separated text, first record is the header
    Csv,
}

impl TableFormat {
    /// Resolve a format from a file extension (without the dot)
    ///
    /// Matching is exact: `XLSX` or `Csv` are not recognised.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            XLSX_EXTENSION => Some(Self::Xlsx),
            CSV_EXTENSION => Some(Self::Csv),
            _ => None,
        }
    }

    /// File extension for this format (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => XLSX_EXTENSION,
            Self::Csv => CSV_EXTENSION,
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
