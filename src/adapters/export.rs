//! Flattened export of a processed result into a zip archive.
//!
//! The archive is a simplification of the spreadsheet output: the clean sheet
//! keeps only the first field of each row and the duplicates sheet keeps the
//! provenance fields of the chosen layout. `result.json` carries the full data.

use crate::config::options::ExportLayout;
use crate::domain::result::{ProcessedResult, RunSummary};
use crate::utils::error::{CleanError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const CLEAN_FILE: &str = "clean.csv";
pub const DUPLICATES_FILE: &str = "duplicates.csv";
pub const RESULT_FILE: &str = "result.json";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Debug, Serialize)]
struct CleanExportRow {
    #[serde(rename = "Clean Data")]
    value: String,
}

#[derive(Debug, Serialize)]
struct DetailedDuplicateRow<'a> {
    #[serde(rename = "Duplicated Value")]
    value: &'a str,
    #[serde(rename = "Original Sheet")]
    original_sheet: &'a str,
    #[serde(rename = "Original Row")]
    original_row: usize,
    #[serde(rename = "Column")]
    column: &'a str,
    #[serde(rename = "Occurrence")]
    occurrence: u32,
}

#[derive(Debug, Serialize)]
struct CompactDuplicateRow<'a> {
    #[serde(rename = "Value")]
    value: &'a str,
    #[serde(rename = "Original Row")]
    original_row: usize,
    #[serde(rename = "Sheet")]
    sheet: &'a str,
    #[serde(rename = "Times Duplicated")]
    times_duplicated: u32,
}

/// First field value of every clean row, as text.
pub fn flatten_clean(result: &ProcessedResult) -> Vec<String> {
    result
        .clean
        .rows
        .iter()
        .map(|clean| clean.row.first_value().map(ToString::to_string).unwrap_or_default())
        .collect()
}

fn into_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CleanError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CleanError::ProcessingError {
        message: format!("export produced invalid UTF-8: {}", e),
    })
}

pub fn clean_csv(result: &ProcessedResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if result.clean.rows.is_empty() {
        writer.write_record(["Clean Data"])?;
    }
    for value in flatten_clean(result) {
        writer.serialize(CleanExportRow { value })?;
    }
    into_csv(writer)
}

pub fn duplicates_csv(result: &ProcessedResult, layout: ExportLayout) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let rows = &result.duplicates.rows;

    match layout {
        ExportLayout::Detailed => {
            if rows.is_empty() {
                writer.write_record(["Duplicated Value", "Original Sheet", "Original Row", "Column", "Occurrence"])?;
            }
            for row in rows {
                writer.serialize(DetailedDuplicateRow {
                    value: &row.value,
                    original_sheet: &row.original_sheet,
                    original_row: row.original_row,
                    column: &row.column,
                    occurrence: row.occurrence,
                })?;
            }
        }
        ExportLayout::Compact => {
            if rows.is_empty() {
                writer.write_record(["Value", "Original Row", "Sheet", "Times Duplicated"])?;
            }
            for row in rows {
                writer.serialize(CompactDuplicateRow {
                    value: &row.value,
                    original_row: row.original_row,
                    sheet: &row.original_sheet,
                    times_duplicated: row.occurrence,
                })?;
            }
        }
    }

    into_csv(writer)
}

/// `customers.csv` -> `customers_processed.zip`.
pub fn archive_name(input_path: &str) -> String {
    let stem = Path::new(input_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    format!("{}_processed.zip", stem)
}

pub fn export_archive(result: &ProcessedResult, summary: &RunSummary, layout: ExportLayout) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(CLEAN_FILE, FileOptions::default())?;
    zip.write_all(clean_csv(result)?.as_bytes())?;

    zip.start_file::<_, ()>(DUPLICATES_FILE, FileOptions::default())?;
    zip.write_all(duplicates_csv(result, layout)?.as_bytes())?;

    zip.start_file::<_, ()>(RESULT_FILE, FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(result)?.as_bytes())?;

    zip.start_file::<_, ()>(SUMMARY_FILE, FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(summary)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
