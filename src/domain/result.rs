use crate::domain::model::{CellValue, Column, Location, Row};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

pub const SHEET_NAME_KEY: &str = "_sheetName";
pub const PROCESSED_LOCATIONS_KEY: &str = "_processedLocations";

pub const DUPLICATE_VALUE_KEY: &str = "duplicate_value";
pub const ORIGINAL_SHEET_KEY: &str = "original_sheet";
pub const ORIGINAL_ROW_KEY: &str = "original_row";
pub const CURRENT_SHEET_KEY: &str = "current_sheet";
pub const CURRENT_ROW_KEY: &str = "current_row";
pub const COLUMN_KEY: &str = "column";
pub const OCCURRENCE_KEY: &str = "occurrence";

/// A row kept in the clean dataset, annotated with where its values were seen.
/// Serializes as its record, keyed like the clean headers.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRow {
    pub row: Row,
    pub sheet_name: String,
    pub locations: Vec<Location>,
}

impl CleanRow {
    /// Original fields followed by the two synthetic ones.
    pub fn to_record(&self) -> IndexMap<String, serde_json::Value> {
        let mut record = row_fields(&self.row);
        record.insert(
            SHEET_NAME_KEY.to_string(),
            serde_json::Value::String(self.sheet_name.clone()),
        );
        record.insert(
            PROCESSED_LOCATIONS_KEY.to_string(),
            serde_json::to_value(&self.locations).unwrap_or(serde_json::Value::Null),
        );
        record
    }
}

/// A repeated cell, with its row and 1-based provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateRow {
    pub row: Row,
    pub value: String,
    pub original_sheet: String,
    pub original_row: usize,
    pub current_sheet: String,
    pub current_row: usize,
    pub column: String,
    pub occurrence: u32,
}

impl DuplicateRow {
    pub fn to_record(&self) -> IndexMap<String, serde_json::Value> {
        let mut record = row_fields(&self.row);
        record.insert(DUPLICATE_VALUE_KEY.to_string(), self.value.clone().into());
        record.insert(ORIGINAL_SHEET_KEY.to_string(), self.original_sheet.clone().into());
        record.insert(ORIGINAL_ROW_KEY.to_string(), self.original_row.into());
        record.insert(CURRENT_SHEET_KEY.to_string(), self.current_sheet.clone().into());
        record.insert(CURRENT_ROW_KEY.to_string(), self.current_row.into());
        record.insert(COLUMN_KEY.to_string(), self.column.clone().into());
        record.insert(OCCURRENCE_KEY.to_string(), self.occurrence.into());
        record
    }
}

impl Serialize for CleanRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl Serialize for DuplicateRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

fn row_fields(row: &Row) -> IndexMap<String, serde_json::Value> {
    row.cells
        .iter()
        .map(|(key, cell)| {
            let value = match cell {
                CellValue::Empty => serde_json::Value::Null,
                other => serde_json::to_value(other).unwrap_or(serde_json::Value::Null),
            };
            (key.clone(), value)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset<R> {
    pub headers: Vec<Column>,
    pub rows: Vec<R>,
}

impl<R> Dataset<R> {
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedResult {
    pub clean: Dataset<CleanRow>,
    pub duplicates: Dataset<DuplicateRow>,
    pub duplicate_count: usize,
}

/// History record of one run. Only `run_id` and `timestamp` differ between
/// runs over the same input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub file_name: String,
    pub original_row_count: usize,
    pub processed_row_count: usize,
    pub duplicate_count: usize,
    pub applied_options: Vec<String>,
    pub processed_columns: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Output of the transform phase.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub result: ProcessedResult,
    pub summary: RunSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_record_appends_synthetic_fields() {
        let clean = CleanRow {
            row: Row::new().with("name", "Ana").with("age", 30.0),
            sheet_name: "people".to_string(),
            locations: vec![Location::new("people", "name", 0)],
        };

        let record = clean.to_record();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", SHEET_NAME_KEY, PROCESSED_LOCATIONS_KEY]);
        assert_eq!(record[SHEET_NAME_KEY], "people");
        assert_eq!(record[PROCESSED_LOCATIONS_KEY][0]["column_key"], "name");
    }

    #[test]
    fn test_duplicate_record_carries_provenance() {
        let duplicate = DuplicateRow {
            row: Row::new().with("name", "ana").with("note", CellValue::Empty),
            value: "ana".to_string(),
            original_sheet: "s1".to_string(),
            original_row: 1,
            current_sheet: "s2".to_string(),
            current_row: 1,
            column: "name".to_string(),
            occurrence: 2,
        };

        let record = duplicate.to_record();
        assert_eq!(record["note"], serde_json::Value::Null);
        assert_eq!(record[DUPLICATE_VALUE_KEY], "ana");
        assert_eq!(record[ORIGINAL_ROW_KEY], 1);
        assert_eq!(record[OCCURRENCE_KEY], 2);
        assert_eq!(record[CURRENT_ROW_KEY], 1);

        let json = serde_json::to_value(&duplicate).unwrap();
        assert_eq!(json[DUPLICATE_VALUE_KEY], "ana");
        assert!(json.get("value").is_none());
    }
}
