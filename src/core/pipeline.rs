use crate::adapters::export::{archive_name, export_archive};
use crate::adapters::reader::read_sheets;
use crate::config::options::{ColumnSelection, ProcessingOptions};
use crate::core::assembler::assemble;
use crate::core::engine::DedupEngine;
use crate::core::normalizer::Normalizer;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::Sheet;
use crate::domain::result::{CleanOutput, ProcessedResult, RunSummary};
use crate::utils::error::{CleanError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;
use std::path::Path;

/// Runs normalization, deduplication and assembly over sheets already in
/// memory. An unspecified selection means every column of every sheet.
pub fn process_sheets(
    sheets: &[Sheet],
    options: &ProcessingOptions,
    selection: &ColumnSelection,
) -> Result<ProcessedResult> {
    let first_sheet = sheets.first().ok_or_else(|| CleanError::InvalidInput {
        message: "the file contains no sheets".to_string(),
    })?;
    if !first_sheet.has_headers() {
        return Err(CleanError::InvalidInput {
            message: format!("sheet '{}' has no header row", first_sheet.name),
        });
    }

    options.validate()?;

    let resolved;
    let selection = if selection.is_unspecified() {
        resolved = ColumnSelection::all_columns(sheets);
        &resolved
    } else {
        selection
    };
    if !selection.selects_any(sheets) {
        return Err(CleanError::NothingSelected);
    }
    if let Some(column) = selection.missing_columns(sheets).into_iter().next() {
        return Err(CleanError::InvalidConfigValueError {
            field: "columns".to_string(),
            value: column,
            reason: "No selected sheet has a column with this key".to_string(),
        });
    }

    let normalizer = Normalizer::new(options)?;
    let output = DedupEngine::new(&normalizer, options).process(sheets, selection);
    assemble(sheets, output)
}

/// File-to-archive pipeline: input bytes come from `I`, the export archive
/// goes to `O`.
pub struct CleanPipeline<I: Storage, O: Storage, C: ConfigProvider> {
    input: I,
    output: O,
    config: C,
}

impl<I: Storage, O: Storage, C: ConfigProvider> CleanPipeline<I, O, C> {
    pub fn new(input: I, output: O, config: C) -> Self {
        Self { input, output, config }
    }

    fn file_name(&self) -> String {
        Path::new(self.config.input_path())
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait::async_trait]
impl<I: Storage, O: Storage, C: ConfigProvider> Pipeline for CleanPipeline<I, O, C> {
    async fn extract(&self) -> Result<Vec<Sheet>> {
        let path = self.config.input_path();
        tracing::debug!("Reading input from: {}", path);
        let data = self.input.read_file(path).await?;

        let limit = self.config.max_input_bytes();
        if data.len() > limit {
            return Err(CleanError::InputTooLarge {
                size: data.len(),
                limit,
            });
        }

        let sheets = read_sheets(path, &data)?;
        tracing::debug!(
            "Parsed {} sheet(s), {} rows in total",
            sheets.len(),
            sheets.iter().map(|s| s.rows.len()).sum::<usize>()
        );
        Ok(sheets)
    }

    async fn transform(&self, sheets: Vec<Sheet>) -> Result<CleanOutput> {
        let options = self.config.processing_options();
        let configured = self.config.column_selection();
        let selection = if configured.is_unspecified() {
            ColumnSelection::all_columns(&sheets)
        } else {
            configured
        };

        let result = process_sheets(&sheets, &options, &selection)?;

        let timestamp = Utc::now();
        let summary = RunSummary {
            run_id: format!("run-{}", timestamp.timestamp_millis()),
            file_name: self.file_name(),
            original_row_count: sheets.iter().map(|s| s.rows.len()).sum(),
            processed_row_count: result.clean.total_rows(),
            duplicate_count: result.duplicate_count,
            applied_options: options.applied_options(),
            processed_columns: selection.selected_columns(&sheets),
            timestamp,
        };

        Ok(CleanOutput { result, summary })
    }

    async fn load(&self, output: CleanOutput) -> Result<String> {
        let name = archive_name(self.config.input_path());
        let output_path = format!("{}/{}", self.config.output_path(), name);

        let zip_data = export_archive(&output.result, &output.summary, self.config.export_layout())?;

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.output.write_file(&name, &zip_data).await?;

        tracing::debug!("ZIP file saved successfully");
        Ok(output_path)
    }
}
