//! Table merging workflow
//!
//! Concatenates every table in a folder into one output file.

use crate::domain::naming::{clean_path, extension};
use crate::domain::table::Table;
use crate::domain::table_format::TableFormat;
use crate::error::{LoadFailure, TableError};
use crate::infra::table_io::{read_table, write_table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Parameters of one merge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeRequest {
    /// Folder holding the tables to merge; surrounding quotes are ignored
    pub source_dir: String,
    /// Output path without extension
    pub destination: String,
}

impl MergeRequest {
    pub fn new(source_dir: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source_dir: source_dir.into(),
            destination: destination.into(),
        }
    }
}

/// Result of a completed merge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeReport {
    /// Written file
    pub output_path: PathBuf,
    /// Format of the written file, taken from the last source entry
    pub format: TableFormat,
    /// Source entries in the order they were concatenated
    pub sources: Vec<PathBuf>,
    /// The concatenated table
    pub table: Table,
}

/// Merge every table in a folder into one file
pub fn merge_tables(request: &MergeRequest) -> Result<MergeReport, TableError> {
    merge_tables_with_progress(request, |_, _| {})
}

/// Merge tables, reporting `(loaded, total)` after each source entry
///
/// Entries are taken in file-name order. The output format follows the
/// extension of the last entry. Any entry with an unreadable extension makes
/// the whole merge fail before anything is written.
pub fn merge_tables_with_progress<F>(
    request: &MergeRequest,
    mut on_progress: F,
) -> Result<MergeReport, TableError>
where
    F: FnMut(usize, usize), // (current, total)
{
    let source_dir = PathBuf::from(clean_path(&request.source_dir));
    let sources = list_entries(&source_dir)?;
    let total = sources.len();

    info!(dir = %source_dir.display(), entries = total, "merging tables");

    let mut tables: Vec<Option<Table>> = Vec::with_capacity(total);
    let mut extensions: Vec<String> = Vec::with_capacity(total);

    for (current, path) in sources.iter().enumerate() {
        let ext = extension(&path.to_string_lossy()).to_string();
        let table = match TableFormat::from_extension(&ext) {
            Some(format) => Some(read_table(path, format)?),
            None => {
                warn!(
                    path = %path.display(),
                    extension = %ext,
                    "file with this extension cannot be read"
                );
                None
            }
        };
        tables.push(table);
        extensions.push(ext);
        on_progress(current + 1, total);
    }

    // A single unreadable entry spoils the whole merge
    if let Some(position) = tables.iter().position(Option::is_none) {
        return Err(LoadFailure::UnreadableExtension(extensions[position].clone()).into());
    }

    let table = Table::concat(tables.into_iter().flatten())?
        .ok_or_else(|| TableError::NothingToMerge(source_dir.clone()))?;

    let last_ext = extensions
        .last()
        .ok_or_else(|| TableError::NothingToMerge(source_dir.clone()))?;
    let format = TableFormat::from_extension(last_ext)
        .ok_or_else(|| TableError::UnsupportedFormat(last_ext.clone()))?;

    let output_path = PathBuf::from(format!("{}.{}", request.destination, format.extension()));
    write_table(&table, &output_path, format)?;

    info!(path = %output_path.display(), rows = table.len(), "merge finished");
    Ok(MergeReport {
        output_path,
        format,
        sources,
        table,
    })
}

/// List the direct entries of a folder, sorted by file name
fn list_entries(dir: &Path) -> Result<Vec<PathBuf>, TableError> {
    if !dir.is_dir() {
        return Err(TableError::PathNotFound(dir.to_path_buf()));
    }

    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(entries)
}
