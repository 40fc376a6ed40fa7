//! tablesplit - Split a table by column values and merge tables back together
//!
//! This crate provides functionality to:
//! - Read and write spreadsheet (`.xlsx`) and delimited text (`.csv`) tables, all cells as text
//! - Split one table into a folder of files, one per distinct value of a column
//! - Merge a folder of same-shaped tables into a single file

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::merger::{MergeReport, MergeRequest, merge_tables, merge_tables_with_progress};
pub use app::splitter::{
    SplitFailure, SplitOutput, SplitReport, SplitRequest, split_table, split_table_with_progress,
};
pub use constants::*;
pub use domain::table::Table;
pub use domain::table_format::TableFormat;
pub use error::{LoadFailure, TableError};

/// Initialize logging for the library
///
/// The filter is taken from `RUST_LOG`, falling back to warnings only.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablesplit=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
