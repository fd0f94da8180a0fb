//! CSV persistence for flattened records and combined box score rows

use crate::data_fetcher::models::{Record, value_to_cell_text};
use crate::data_fetcher::processors::{COMBINED_HEADERS, FlatPlayerRow};
use crate::error::AppError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Creates the parent directory of `path` if it has one and it is missing.
pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Column set of a record table: every key that appears in any record, in
/// first-seen order.
pub fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Writes flattened records as a comma separated table with one header row.
/// Records lacking a column get an empty cell. Returns the number of data rows.
pub fn write_records(path: &Path, records: &[Record]) -> Result<usize, AppError> {
    ensure_parent_dir(path)?;
    let columns = collect_columns(records);
    if columns.is_empty() {
        // Nothing to describe; leave an empty file behind
        fs::write(path, "")?;
        return Ok(records.len());
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(&columns)?;

    for record in records {
        writer.write_record(columns.iter().map(|column| {
            record
                .get(column)
                .map(value_to_cell_text)
                .unwrap_or_default()
        }))?;
    }
    writer.flush()?;

    debug!(
        "Wrote {} records with {} columns to {}",
        records.len(),
        columns.len(),
        path.display()
    );
    Ok(records.len())
}

/// Writes the combined box score table. The fixed header is written even
/// when there are no rows.
pub fn write_player_rows(path: &Path, rows: &[FlatPlayerRow]) -> Result<usize, AppError> {
    ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(COMBINED_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Writes a single column table.
pub fn write_column(path: &Path, header: &str, values: &[String]) -> Result<usize, AppError> {
    ensure_parent_dir(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record([header])?;
    for value in values {
        writer.write_record([value])?;
    }
    writer.flush()?;

    Ok(values.len())
}

/// Reads a table into its header row and data rows. A missing file and a
/// file without a header row both yield `MissingUpstreamFile`.
pub fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), AppError> {
    if !path.exists() {
        return Err(AppError::missing_upstream_file(path.display().to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::missing_upstream_file(path.display().to_string()));
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

/// Reads the values of one named column, in row order.
pub fn read_column(path: &Path, column: &str) -> Result<Vec<String>, AppError> {
    let (headers, rows) = read_rows(path)?;
    let index = column_index(&headers, column)
        .ok_or_else(|| AppError::missing_column(column, path.display().to_string()))?;
    Ok(rows
        .into_iter()
        .map(|mut row| {
            if index < row.len() {
                row.swap_remove(index)
            } else {
                String::new()
            }
        })
        .collect())
}

pub(crate) fn column_index(headers: &[String], column: &str) -> Option<usize> {
    headers.iter().position(|h| h == column)
}
