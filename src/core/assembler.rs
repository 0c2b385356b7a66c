use crate::core::engine::{DuplicateEntry, EngineOutput};
use crate::domain::model::{Column, Sheet};
use crate::domain::result::{
    Dataset, DuplicateRow, ProcessedResult, COLUMN_KEY, CURRENT_SHEET_KEY, DUPLICATE_VALUE_KEY,
    OCCURRENCE_KEY, ORIGINAL_ROW_KEY, ORIGINAL_SHEET_KEY, PROCESSED_LOCATIONS_KEY, SHEET_NAME_KEY,
};
use crate::utils::error::{CleanError, Result};

pub fn clean_headers(first_sheet: &Sheet) -> Vec<Column> {
    let mut headers = first_sheet.columns.clone();
    headers.push(Column::new(SHEET_NAME_KEY, "Origin Sheet"));
    headers.push(Column::new(PROCESSED_LOCATIONS_KEY, "Processed Locations"));
    headers
}

pub fn duplicate_headers() -> Vec<Column> {
    vec![
        Column::new(DUPLICATE_VALUE_KEY, "Duplicated Value"),
        Column::new(ORIGINAL_SHEET_KEY, "Original Sheet"),
        Column::new(ORIGINAL_ROW_KEY, "Original Row"),
        Column::new(CURRENT_SHEET_KEY, "Current Sheet"),
        Column::new(COLUMN_KEY, "Column"),
        Column::new(OCCURRENCE_KEY, "Occurrence"),
    ]
}

/// Row numbers become 1-based here and nowhere else.
fn to_duplicate_row(entry: DuplicateEntry) -> DuplicateRow {
    DuplicateRow {
        row: entry.row,
        value: entry.value,
        original_sheet: entry.original.sheet_name,
        original_row: entry.original.row_index + 1,
        current_sheet: entry.current.sheet_name,
        current_row: entry.current.row_index + 1,
        column: entry.current.column_key,
        occurrence: entry.occurrence,
    }
}

pub fn assemble(sheets: &[Sheet], output: EngineOutput) -> Result<ProcessedResult> {
    let first_sheet = sheets.first().ok_or_else(|| CleanError::InvalidInput {
        message: "no sheets to assemble".to_string(),
    })?;

    let duplicates: Vec<DuplicateRow> = output.duplicates.into_iter().map(to_duplicate_row).collect();
    let duplicate_count = duplicates.len();

    Ok(ProcessedResult {
        clean: Dataset {
            headers: clean_headers(first_sheet),
            rows: output.clean_rows,
        },
        duplicates: Dataset {
            headers: duplicate_headers(),
            rows: duplicates,
        },
        duplicate_count,
    })
}
