//! Table file I/O operations
//!
//! This module reads and writes spreadsheet and CSV tables. Every cell is
//! read and written as text; nothing is coerced to numbers or dates.

use crate::constants::{DEFAULT_SHEET_NAME, UNNAMED_COLUMN_PREFIX};
use crate::domain::naming::extension;
use crate::domain::table::{Row, Table};
use crate::domain::table_format::TableFormat;
use crate::error::TableError;
use calamine::{Data, ExcelDateTime, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook};
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::debug;

/// Maximum number of rows on a worksheet (header included)
const XLSX_MAX_ROWS: usize = 1_048_576;

/// Maximum number of columns on a worksheet
const XLSX_MAX_COLUMNS: usize = 16_384;

/// Load a table from file
///
/// # Errors
///
/// Returns `PathNotFound` if `path` is not an existing file, or a format error
/// if the content cannot be parsed.
pub fn read_table(path: impl AsRef<Path>, format: TableFormat) -> Result<Table, TableError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TableError::PathNotFound(path.to_path_buf()));
    }

    let table = match format {
        TableFormat::Xlsx => read_xlsx(path)?,
        TableFormat::Csv => read_csv(path)?,
    };

    debug!(
        path = %path.display(),
        %format,
        rows = table.len(),
        columns = table.columns().len(),
        "table loaded"
    );
    Ok(table)
}

/// Load a table, selecting the format from the file extension
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the extension is neither `xlsx` nor `csv`.
pub fn read_table_by_extension(path: impl AsRef<Path>) -> Result<Table, TableError> {
    let path = path.as_ref();
    let ext = extension(&path.to_string_lossy()).to_string();
    let format = TableFormat::from_extension(&ext).ok_or(TableError::UnsupportedFormat(ext))?;
    read_table(path, format)
}

/// Save table to file
///
/// Rows and columns are written in order, without an index column.
pub fn write_table(
    table: &Table,
    path: impl AsRef<Path>,
    format: TableFormat,
) -> Result<(), TableError> {
    let path = path.as_ref();
    match format {
        TableFormat::Xlsx => write_xlsx(table, path)?,
        TableFormat::Csv => write_csv(table, path)?,
    }

    debug!(path = %path.display(), %format, rows = table.len(), "table saved");
    Ok(())
}

// =============================================================================
// CSV
// =============================================================================

fn read_csv(path: &Path) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let header = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(normalize_header(header));
    let width = table.columns().len();

    for record in reader.records() {
        let record = record?;
        let mut row: Row = record
            .iter()
            .map(|field| (!field.is_empty()).then(|| field.to_string()))
            .collect();
        // Short records are padded with nulls; long ones are rejected by push_row
        if row.len() < width {
            row.resize(width, None);
        }
        table.push_row(row)?;
    }

    Ok(table)
}

fn write_csv(table: &Table, path: &Path) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    writer.flush()?;
    Ok(())
}

// =============================================================================
// XLSX
// =============================================================================

fn read_xlsx(path: &Path) -> Result<Table, TableError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        return Ok(Table::default());
    };
    let range = range?;

    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return Ok(Table::default());
    };

    let header = header_cells
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let mut table = Table::new(normalize_header(header));

    for cells in rows {
        table.push_row(cells.iter().map(cell_text).collect())?;
    }

    Ok(table)
}

fn write_xlsx(table: &Table, path: &Path) -> Result<(), TableError> {
    let rows = table.len();
    let columns = table.columns().len();
    if rows + 1 > XLSX_MAX_ROWS || columns > XLSX_MAX_COLUMNS {
        return Err(TableError::SheetTooLarge { rows, columns });
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(DEFAULT_SHEET_NAME)?;

    // Bounds were checked above, so the casts below cannot truncate
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name.as_str(), &header_format)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            if let Some(text) = cell {
                worksheet.write_string(r as u32 + 1, col as u16, text.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Render a spreadsheet cell as text (`None` for empty cells)
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Dates as `YYYY-MM-DD HH:MM:SS`, durations and time-only cells as `H:MM:SS`
///
/// Falls back to the raw serial value when the cell is outside chrono's range.
fn datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let seconds = duration.num_seconds();
            return format!(
                "{:02}:{:02}:{:02}",
                seconds / 3600,
                seconds % 3600 / 60,
                seconds % 60
            );
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    dt.as_f64().to_string()
}

/// Render a number the way the source tables show it as text
///
/// Whole numbers below 1e16 lose their fractional part (`3.0` → `3`).
/// Magnitudes below 1e-4 or from 1e16 up use an exponent with a sign and at
/// least two digits (`1e+20`, `1.5e-05`); everything else is the shortest
/// decimal that round-trips (`0.25`, `1234.5`).
fn float_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e16 {
        return format!("{}", value as i64);
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e')
        && let Ok(exponent) = exponent.parse::<i32>()
        && !(-4..16).contains(&exponent)
    {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    value.to_string()
}

// =============================================================================
// Header normalization
// =============================================================================

/// Give blank header cells a positional label and de-duplicate repeated labels
///
/// `["a", "", "a"]` becomes `["a", "Unnamed: 1", "a.1"]`.
fn normalize_header(header: Vec<String>) -> Vec<String> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let mut columns = Vec::with_capacity(header.len());

    for (index, name) in header.into_iter().enumerate() {
        let name = if name.is_empty() {
            format!("{}{}", UNNAMED_COLUMN_PREFIX, index)
        } else {
            name
        };

        let count = counts.entry(name.clone()).or_insert(0);
        let label = if *count == 0 {
            name
        } else {
            format!("{}.{}", name, count)
        };
        *count += 1;
        columns.push(label);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use rust_xlsxwriter::ExcelDateTime;

    fn sample_table() -> Table {
        Table::from_rows(
            vec!["code".to_string(), "city".to_string(), "note".to_string()],
            vec![
                vec![Some("007".into()), Some("Paris".into()), None],
                vec![Some("1.50".into()), Some("\"Lyon\"".into()), Some("a, b".into())],
                vec![Some("1e3".into()), None, Some("x".into())],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_csv_keeps_text_literally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");

        write_table(&sample_table(), &path, TableFormat::Csv).expect("Failed to save");
        let loaded = read_table(&path, TableFormat::Csv).expect("Failed to load");

        assert_eq!(loaded, sample_table());
    }

    #[test]
    fn test_csv_layout_has_no_index_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");

        write_table(&sample_table(), &path, TableFormat::Csv).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("code,city,note"));
        assert_eq!(lines.next(), Some("007,Paris,"));
        assert_eq!(lines.next(), Some(r#"1.50,"""Lyon""","a, b""#));
    }

    #[test]
    fn test_xlsx_keeps_text_literally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.xlsx");

        write_table(&sample_table(), &path, TableFormat::Xlsx).expect("Failed to save");
        let loaded = read_table(&path, TableFormat::Xlsx).expect("Failed to load");

        assert_eq!(loaded, sample_table());
    }

    #[test]
    fn test_xlsx_numeric_cells_read_as_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("n.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "int").unwrap();
        sheet.write_string(0, 1, "float").unwrap();
        sheet.write_string(0, 2, "flag").unwrap();
        sheet.write_number(1, 0, 42.0).unwrap();
        sheet.write_number(1, 1, 2.5).unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        workbook.save(&path).unwrap();

        let loaded = read_table(&path, TableFormat::Xlsx).unwrap();
        assert_eq!(loaded.cell(0, "int"), Some("42"));
        assert_eq!(loaded.cell(0, "float"), Some("2.5"));
        assert_eq!(loaded.cell(0, "flag"), Some("True"));
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_table("/nonexistent/path/file.csv", TableFormat::Csv);
        assert!(matches!(result, Err(TableError::PathNotFound(_))));
    }

    #[test]
    fn test_read_by_extension_rejects_unknown() {
        let result = read_table_by_extension("/nonexistent/path/file.txt");
        assert!(matches!(result, Err(TableError::UnsupportedFormat(ref e)) if e == "txt"));
    }

    #[test]
    fn test_xlsx_date_cells_read_as_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("d.xlsx");

        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let stamp_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
        let date = ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        let stamp = ExcelDateTime::from_ymd(2024, 1, 15)
            .unwrap()
            .and_hms(12, 0, 0)
            .unwrap();

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "when").unwrap();
        sheet.write_string(0, 1, "stamp").unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        sheet.write_datetime_with_format(1, 1, &stamp, &stamp_format).unwrap();
        workbook.save(&path).unwrap();

        let loaded = read_table(&path, TableFormat::Xlsx).unwrap();
        assert_eq!(loaded.cell(0, "when"), Some("2024-01-15 00:00:00"));
        assert_eq!(loaded.cell(0, "stamp"), Some("2024-01-15 12:00:00"));
    }

    #[test]
    fn test_short_csv_rows_are_padded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("short.csv");
        fs::write(&path, "a,b,c\n1,2\n3,4,5\n").unwrap();

        let loaded = read_table(&path, TableFormat::Csv).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.rows()[0], vec![Some("1".into()), Some("2".into()), None]);
        assert_eq!(loaded.cell(1, "c"), Some("5"));
    }

    #[test]
    fn test_long_csv_row_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.csv");
        fs::write(&path, "a,b\n1,2\n3,4,5\n").unwrap();

        let result = read_table(&path, TableFormat::Csv);
        assert!(matches!(
            result,
            Err(TableError::RowWidthMismatch {
                row: 1,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_csv_with_bom_and_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}a,b\n1,2\n\n3,4\n").unwrap();

        let loaded = read_table(&path, TableFormat::Csv).unwrap();
        assert_eq!(loaded.columns(), &["a".to_string(), "b".to_string()][..]);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.cell(1, "a"), Some("3"));
    }

    #[test]
    fn test_normalize_header() {
        let header = vec!["a".to_string(), String::new(), "a".to_string(), "a".to_string()];
        assert_eq!(
            normalize_header(header),
            vec!["a", "Unnamed: 1", "a.1", "a.2"]
        );
    }

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(3.0), "3");
        assert_eq!(float_text(-12.0), "-12");
        assert_eq!(float_text(0.25), "0.25");
        assert_eq!(float_text(1234.5), "1234.5");
        assert_eq!(float_text(0.0001), "0.0001");
        assert_eq!(float_text(1.5e-5), "1.5e-05");
        assert_eq!(float_text(1e20), "1e+20");
        assert_eq!(float_text(-2.5e16), "-2.5e+16");
        assert_eq!(float_text(f64::NAN), "nan");
    }
}
