pub mod cli;
pub mod options;
pub mod toml_config;

use crate::config::options::{ColumnSelection, ALL_SHEETS};
use indexmap::IndexMap;

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

/// Parses `--columns` entries. `sheet:column` targets one sheet; a bare
/// `column` applies to every sheet without its own entry.
pub fn parse_column_list(entries: &[String]) -> ColumnSelection {
    let mut table: IndexMap<String, Vec<String>> = IndexMap::new();
    for entry in entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        let (sheet, column) = match entry.split_once(':') {
            Some((sheet, column)) if !sheet.is_empty() => (sheet, column),
            _ => (ALL_SHEETS, entry),
        };
        let columns = table.entry(sheet.to_string()).or_default();
        if !columns.iter().any(|c| c == column) {
            columns.push(column.to_string());
        }
    }
    ColumnSelection::from_table(table)
}

#[cfg(feature = "cli")]
mod args {
    use super::parse_column_list;
    use crate::adapters::reader::SUPPORTED_EXTENSIONS;
    use crate::config::options::{ColumnSelection, ExportLayout, PatternPolicy, ProcessingOptions, ReplacementRule};
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    fn parse_replacement(pair: &str) -> std::result::Result<ReplacementRule, String> {
        ReplacementRule::parse_pair(pair).map_err(|e| e.to_string())
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "sheet-clean")]
    #[command(about = "Find and remove duplicate values across spreadsheet sheets")]
    pub struct CliConfig {
        /// Input file (.csv, .tsv or .json workbook)
        #[arg(long)]
        pub input: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        /// Columns to check, `column` or `sheet:column`. Defaults to every column.
        #[arg(long, value_delimiter = ',')]
        pub columns: Vec<String>,

        #[arg(long, help = "Track values but emit no duplicate report")]
        pub no_dedup: bool,

        #[arg(long, help = "Compare values without trimming whitespace")]
        pub no_trim: bool,

        #[arg(long, conflicts_with = "uppercase")]
        pub lowercase: bool,

        #[arg(long)]
        pub uppercase: bool,

        #[arg(long)]
        pub keep_empty_rows: bool,

        #[arg(long)]
        pub format_numbers: bool,

        #[arg(long)]
        pub format_dates: bool,

        #[arg(long, help = "Keep rows whose selected cells are all empty")]
        pub keep_untracked_rows: bool,

        /// Regex substitution applied to every value, in order given
        #[arg(long = "replace", value_name = "FROM=TO", value_parser = parse_replacement)]
        pub replacements: Vec<ReplacementRule>,

        #[arg(long, help = "Fail the run on an invalid replacement pattern")]
        pub strict_patterns: bool,

        #[arg(long, value_enum, default_value_t = ExportLayout::Detailed)]
        pub layout: ExportLayout,

        #[arg(long, default_value = "10")]
        pub max_input_mb: usize,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log phase timings and process stats")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn processing_options(&self) -> ProcessingOptions {
            ProcessingOptions {
                remove_duplicates: !self.no_dedup,
                trim_whitespace: !self.no_trim,
                convert_to_lowercase: self.lowercase,
                convert_to_uppercase: self.uppercase,
                remove_empty_rows: !self.keep_empty_rows,
                format_numbers: self.format_numbers,
                format_dates: self.format_dates,
                keep_untracked_rows: self.keep_untracked_rows,
                custom_replacements: self.replacements.clone(),
                on_invalid_pattern: if self.strict_patterns {
                    PatternPolicy::Abort
                } else {
                    PatternPolicy::Skip
                },
            }
        }

        fn column_selection(&self) -> ColumnSelection {
            parse_column_list(&self.columns)
        }

        fn export_layout(&self) -> ExportLayout {
            self.layout
        }

        fn max_input_bytes(&self) -> usize {
            self.max_input_mb.saturating_mul(1024 * 1024)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_non_empty_string("input", &self.input)?;
            validation::validate_file_extension("input", &self.input, SUPPORTED_EXTENSIONS)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_positive_number("max_input_mb", self.max_input_mb, 1)?;
            self.processing_options().validate()
        }
    }

}
