use crate::domain::model::Sheet;
use crate::utils::error::{CleanError, Result};
use crate::utils::validation::Validate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sheet key in a `[columns]` table that applies to every sheet.
pub const ALL_SHEETS: &str = "*";

/// One `from` -> `to` regex substitution, applied to every match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub from: String,
    pub to: String,
}

impl ReplacementRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Parses the `FROM=TO` form used on the command line. The first `=` splits.
    pub fn parse_pair(pair: &str) -> Result<Self> {
        let (from, to) = pair
            .split_once('=')
            .ok_or_else(|| CleanError::InvalidConfigValueError {
                field: "replace".to_string(),
                value: pair.to_string(),
                reason: "Expected FROM=TO".to_string(),
            })?;
        Ok(Self::new(from, to))
    }
}

/// What to do with a replacement rule whose pattern does not compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternPolicy {
    #[default]
    Skip,
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    pub remove_duplicates: bool,
    pub trim_whitespace: bool,
    pub convert_to_lowercase: bool,
    pub convert_to_uppercase: bool,
    pub remove_empty_rows: bool,
    pub format_numbers: bool,
    pub format_dates: bool,
    /// Pass rows that produced no tracked value through to the clean set.
    pub keep_untracked_rows: bool,
    pub custom_replacements: Vec<ReplacementRule>,
    pub on_invalid_pattern: PatternPolicy,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            trim_whitespace: true,
            convert_to_lowercase: false,
            convert_to_uppercase: false,
            remove_empty_rows: true,
            format_numbers: false,
            format_dates: false,
            keep_untracked_rows: false,
            custom_replacements: Vec::new(),
            on_invalid_pattern: PatternPolicy::Skip,
        }
    }
}

impl ProcessingOptions {
    /// Names of the enabled toggles, in declaration order.
    pub fn applied_options(&self) -> Vec<String> {
        [
            ("remove_duplicates", self.remove_duplicates),
            ("trim_whitespace", self.trim_whitespace),
            ("convert_to_lowercase", self.convert_to_lowercase),
            ("convert_to_uppercase", self.convert_to_uppercase),
            ("remove_empty_rows", self.remove_empty_rows),
            ("format_numbers", self.format_numbers),
            ("format_dates", self.format_dates),
            ("keep_untracked_rows", self.keep_untracked_rows),
        ]
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

impl Validate for ProcessingOptions {
    fn validate(&self) -> Result<()> {
        if self.convert_to_lowercase && self.convert_to_uppercase {
            return Err(CleanError::CaseConflict);
        }
        Ok(())
    }
}

/// Columns to scan, per sheet. Sheets without an entry fall back to the
/// wildcard list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    by_sheet: IndexMap<String, Vec<String>>,
    all_sheets: Vec<String>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select<I, S>(mut self, sheet: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_sheet
            .insert(sheet.into(), columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn for_all_sheets<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.all_sheets = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Builds a selection from a `[columns]` table; the `*` key is the wildcard.
    pub fn from_table(table: IndexMap<String, Vec<String>>) -> Self {
        table
            .into_iter()
            .fold(Self::new(), |selection, (sheet, columns)| {
                if sheet == ALL_SHEETS {
                    selection.for_all_sheets(columns)
                } else {
                    selection.select(sheet, columns)
                }
            })
    }

    /// Every column of every sheet.
    pub fn all_columns(sheets: &[Sheet]) -> Self {
        sheets.iter().fold(Self::new(), |selection, sheet| {
            let columns: Vec<String> = sheet.column_keys().map(str::to_string).collect();
            selection.select(sheet.name.clone(), columns)
        })
    }

    pub fn columns_for(&self, sheet: &str) -> &[String] {
        self.by_sheet
            .get(sheet)
            .map(Vec::as_slice)
            .unwrap_or(&self.all_sheets)
    }

    /// True when nothing was configured at all.
    pub fn is_unspecified(&self) -> bool {
        self.by_sheet.is_empty() && self.all_sheets.is_empty()
    }

    pub fn selects_any(&self, sheets: &[Sheet]) -> bool {
        sheets.iter().any(|sheet| !self.columns_for(&sheet.name).is_empty())
    }

    /// Selected keys that match no header of any sheet they are selected for.
    pub fn missing_columns(&self, sheets: &[Sheet]) -> Vec<String> {
        self.selected_columns(sheets)
            .into_iter()
            .filter(|column| {
                !sheets.iter().any(|sheet| {
                    self.columns_for(&sheet.name).contains(column) && sheet.column_keys().any(|key| key == column)
                })
            })
            .collect()
    }

    /// Distinct selected column keys across the given sheets, first-seen order.
    pub fn selected_columns(&self, sheets: &[Sheet]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for sheet in sheets {
            for column in self.columns_for(&sheet.name) {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        columns
    }
}

/// Shape of the duplicates sheet in the export archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportLayout {
    /// Value, original sheet, original row, column, occurrence.
    #[default]
    Detailed,
    /// Value, original row, sheet, times duplicated.
    Compact,
}
