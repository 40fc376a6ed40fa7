//! Table splitting related constants

// =============================================================================
// Grouping
// =============================================================================

/// Grouping key substituted for empty cells in the split column
pub const NULL_SENTINEL: &str = "value not specified";

// =============================================================================
// File formats
// =============================================================================

/// Extension of the spreadsheet format
pub const XLSX_EXTENSION: &str = "xlsx";

/// Extension of the delimited text format
pub const CSV_EXTENSION: &str = "csv";

/// Name of the single worksheet written to spreadsheet files
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Header label prefix used for blank spreadsheet header cells
pub const UNNAMED_COLUMN_PREFIX: &str = "Unnamed: ";
