//! In-memory table model
//!
//! A table is an ordered list of rows sharing one ordered header. Every cell is
//! text or null; no type inference is ever applied.

use crate::constants::NULL_SENTINEL;
use crate::error::{LoadFailure, TableError};
use rustc_hash::{FxHashMap, FxHashSet};

/// One table row, positionally aligned with the header (`None` = null cell)
pub type Row = Vec<Option<String>>;

/// Ordered rows of text cells under a shared header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from a header and rows
    ///
    /// # Errors
    ///
    /// Returns `RowWidthMismatch` for the first row whose width differs from the header.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, TableError> {
        let mut table = Self::new(columns);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn push_row(&mut self, row: Row) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidthMismatch {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a cell by row index and column name
    ///
    /// Returns `None` for null cells as well as for unknown rows or columns.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| LoadFailure::MissingColumn(name.to_string()).into())
    }

    /// Replace null cells of `column` with `value`
    ///
    /// Returns the number of cells filled.
    pub fn fill_null(&mut self, column: &str, value: &str) -> Result<usize, TableError> {
        let index = self.require_column(column)?;
        let mut filled = 0;
        for row in &mut self.rows {
            if row[index].is_none() {
                row[index] = Some(value.to_string());
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Distinct values of `column` in first-seen order
    ///
    /// Null cells are skipped.
    pub fn unique(&self, column: &str) -> Result<Vec<String>, TableError> {
        let index = self.require_column(column)?;
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut values = Vec::new();
        for value in self.rows.iter().filter_map(|row| row[index].as_deref()) {
            if seen.insert(value) {
                values.push(value.to_string());
            }
        }
        Ok(values)
    }

    /// Partition the rows by the value of `column`
    ///
    /// Groups come out in first-seen order of their key and keep the relative
    /// row order of this table. Null cells are keyed by [`NULL_SENTINEL`].
    pub fn group_by(self, column: &str) -> Result<Vec<(String, Table)>, TableError> {
        let index = self.require_column(column)?;
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        let mut groups: Vec<(String, Table)> = Vec::new();

        for row in self.rows {
            let key = row[index].as_deref().unwrap_or(NULL_SENTINEL);
            let slot = match positions.get(key) {
                Some(&slot) => slot,
                None => {
                    positions.insert(key.to_string(), groups.len());
                    groups.push((key.to_string(), Table::new(self.columns.clone())));
                    groups.len() - 1
                }
            };
            groups[slot].1.rows.push(row);
        }

        Ok(groups)
    }

    /// Concatenate tables row-wise, preserving table order then row order
    ///
    /// Returns `Ok(None)` when no tables are given.
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` when a header differs from the first table's header.
    pub fn concat<I>(tables: I) -> Result<Option<Table>, TableError>
    where
        I: IntoIterator<Item = Table>,
    {
        let mut tables = tables.into_iter();
        let Some(mut combined) = tables.next() else {
            return Ok(None);
        };

        for table in tables {
            if table.columns != combined.columns {
                return Err(TableError::SchemaMismatch {
                    expected: combined.columns,
                    found: table.columns,
                });
            }
            combined.rows.extend(table.rows);
        }

        Ok(Some(combined))
    }
}
