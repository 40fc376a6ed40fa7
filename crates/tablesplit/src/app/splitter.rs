//! Table splitting workflow
//!
//! Splits one table into a folder of files, one file per distinct value of a
//! chosen column.

use crate::constants::NULL_SENTINEL;
use crate::domain::naming::{clean_path, extension, folder_name, output_file_name, sanitize_name};
use crate::domain::table_format::TableFormat;
use crate::error::{LoadFailure, TableError};
use crate::infra::folder::create_folder;
use crate::infra::table_io::{read_table, write_table};
use std::path::PathBuf;
use tracing::{debug, info};

/// Parameters of one split
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitRequest {
    /// Source file path; surrounding quotes are ignored
    pub source: String,
    /// Column whose values decide the output files
    pub column: String,
    /// Text placed before the value in each file name
    pub prefix: String,
    /// Text placed after the value in each file name
    pub postfix: String,
    /// Directory in which the output folder is created
    pub output_root: PathBuf,
}

impl SplitRequest {
    /// Create a request with empty prefix/postfix, writing under the current directory
    pub fn new(source: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            column: column.into(),
            prefix: String::new(),
            postfix: String::new(),
            output_root: PathBuf::from("."),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = postfix.into();
        self
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }
}

/// One file written by a split
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutput {
    /// Grouping value (after null substitution, before sanitizing)
    pub value: String,
    /// Path of the written file
    pub path: PathBuf,
    /// Number of rows written
    pub rows: usize,
}

/// Result of a completed split
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitReport {
    /// Folder holding the output files
    pub output_dir: PathBuf,
    /// Format shared by the source and every output file
    pub format: TableFormat,
    /// Written files, in first-seen order of their value
    pub outputs: Vec<SplitOutput>,
}

/// A split that stopped on an error
///
/// Files written before the error stay on disk and are listed in `written`.
#[derive(Debug)]
pub struct SplitFailure {
    pub error: TableError,
    pub written: Vec<PathBuf>,
}

impl SplitFailure {
    /// True if some output files were written before the error
    pub fn is_partial(&self) -> bool {
        !self.written.is_empty()
    }
}

impl From<TableError> for SplitFailure {
    fn from(error: TableError) -> Self {
        Self {
            error,
            written: Vec::new(),
        }
    }
}

impl std::fmt::Display for SplitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.written.is_empty() {
            write!(f, "{}", self.error)
        } else {
            write!(
                f,
                "{} ({} file(s) already written)",
                self.error,
                self.written.len()
            )
        }
    }
}

impl std::error::Error for SplitFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Split a table by the values of one column
pub fn split_table(request: &SplitRequest) -> Result<SplitReport, SplitFailure> {
    split_table_with_progress(request, |_, _| {})
}

/// Split a table, reporting `(written, total)` after each output file
///
/// The output folder is only created once the source table has been loaded
/// and the split column found, so failed loads leave nothing behind.
pub fn split_table_with_progress<F>(
    request: &SplitRequest,
    mut on_progress: F,
) -> Result<SplitReport, SplitFailure>
where
    F: FnMut(usize, usize), // (current, total)
{
    let source = clean_path(&request.source);
    let folder = folder_name(&source);
    if folder.is_empty() {
        return Err(TableError::InvalidSourceName(request.source.clone()).into());
    }

    let ext = extension(&source);
    let format = TableFormat::from_extension(ext)
        .ok_or_else(|| TableError::from(LoadFailure::UnreadableExtension(ext.to_string())))?;

    info!(source = %source, column = %request.column, "splitting table");
    let mut table = read_table(&source, format)?;
    table.fill_null(&request.column, NULL_SENTINEL)?;

    let output_dir = request.output_root.join(&folder);
    if create_folder(&output_dir).map_err(TableError::from)? {
        debug!(dir = %output_dir.display(), "output folder created");
    }

    let groups = table.group_by(&request.column)?;
    let total = groups.len();
    let mut outputs: Vec<SplitOutput> = Vec::with_capacity(total);

    for (current, (value, group)) in groups.into_iter().enumerate() {
        let name = sanitize_name(&value);
        let path = output_dir.join(output_file_name(
            &request.prefix,
            &name,
            &request.postfix,
            format,
        ));

        if let Err(error) = write_table(&group, &path, format) {
            return Err(SplitFailure {
                error,
                written: outputs.into_iter().map(|o| o.path).collect(),
            });
        }

        outputs.push(SplitOutput {
            value,
            path,
            rows: group.len(),
        });
        on_progress(current + 1, total);
    }

    info!(dir = %output_dir.display(), files = outputs.len(), "split finished");
    Ok(SplitReport {
        output_dir,
        format,
        outputs,
    })
}
