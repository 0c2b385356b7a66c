//! Turns uploaded bytes into in-memory sheets.

use crate::domain::model::{CellValue, Column, Row, Sheet};
use crate::utils::error::{CleanError, Result};
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "tsv", "json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Tsv,
    /// Object of sheet name -> array of row objects.
    Json,
}

impl InputFormat {
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("tsv") => Ok(InputFormat::Tsv),
            Some("json") => Ok(InputFormat::Json),
            _ => Err(CleanError::InvalidInput {
                message: format!(
                    "unsupported input file '{}', expected one of: {}",
                    path,
                    SUPPORTED_EXTENSIONS.join(", ")
                ),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Detect numbers and ISO dates; otherwise every non-empty field is text.
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

/// Reads one delimited sheet. The header record supplies the column keys;
/// empty fields become `CellValue::Empty`.
pub fn read_csv_sheet(name: &str, data: &[u8], options: &CsvOptions) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
    for header in &headers {
        if !columns.iter().any(|c| &c.key == header) {
            columns.push(Column::new(header.clone(), header.clone()));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Row = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let raw = record.get(i).unwrap_or("");
                let cell = if raw.is_empty() {
                    CellValue::Empty
                } else if options.infer_types {
                    CellValue::infer(raw)
                } else {
                    CellValue::text(raw)
                };
                (header.clone(), cell)
            })
            .collect();
        rows.push(row);
    }

    tracing::debug!("Read sheet '{}': {} columns, {} rows", name, columns.len(), rows.len());
    Ok(Sheet {
        name: name.to_string(),
        columns,
        rows,
    })
}

pub fn read_json_workbook(data: &[u8]) -> Result<Vec<Sheet>> {
    let workbook: serde_json::Value = serde_json::from_slice(data)?;
    let serde_json::Value::Object(sheets) = workbook else {
        return Err(CleanError::InvalidInput {
            message: "JSON workbook must be an object of sheet name -> rows".to_string(),
        });
    };

    sheets
        .into_iter()
        .map(|(name, rows)| {
            let serde_json::Value::Array(items) = rows else {
                return Err(CleanError::InvalidInput {
                    message: format!("sheet '{}' must be an array of rows", name),
                });
            };
            let rows = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    serde_json::Value::Object(fields) => Ok(fields
                        .into_iter()
                        .map(|(key, value)| (key, CellValue::from(value)))
                        .collect::<Row>()),
                    _ => Err(CleanError::InvalidInput {
                        message: format!("row {} of sheet '{}' is not an object", index + 1, name),
                    }),
                })
                .collect::<Result<Vec<Row>>>()?;
            Ok(Sheet::from_rows(name, rows))
        })
        .collect()
}

/// Parses `data` according to the extension of `path`. Delimited files yield
/// one sheet named after the file stem.
pub fn read_sheets(path: &str, data: &[u8]) -> Result<Vec<Sheet>> {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1");

    match InputFormat::from_path(path)? {
        InputFormat::Csv => Ok(vec![read_csv_sheet(stem, data, &CsvOptions::default())?]),
        InputFormat::Tsv => Ok(vec![read_csv_sheet(stem, data, &CsvOptions::tsv())?]),
        InputFormat::Json => read_json_workbook(data),
    }
}
