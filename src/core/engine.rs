use crate::config::options::{ColumnSelection, ProcessingOptions};
use crate::core::normalizer::Normalizer;
use crate::core::tracker::OccurrenceTracker;
use crate::domain::model::{Location, Row, Sheet};
use crate::domain::result::CleanRow;
use std::collections::HashMap;

/// A repeated cell. Locations are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateEntry {
    pub row: Row,
    pub value: String,
    pub original: Location,
    pub current: Location,
    pub occurrence: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub rows_scanned: usize,
    pub empty_rows_removed: usize,
    pub cells_checked: usize,
    pub cells_skipped: usize,
    pub distinct_values: usize,
    pub repeated_values: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOutput {
    pub clean_rows: Vec<CleanRow>,
    pub duplicates: Vec<DuplicateEntry>,
    pub stats: EngineStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RowId {
    sheet: usize,
    row: usize,
}

/// Clean-set representatives in first-seen order, with the keys each one owns.
#[derive(Default)]
struct Representatives {
    order: Vec<(RowId, Vec<String>)>,
    slots: HashMap<RowId, usize>,
}

impl Representatives {
    fn register(&mut self, id: RowId) -> usize {
        let order = &mut self.order;
        *self.slots.entry(id).or_insert_with(|| {
            order.push((id, Vec::new()));
            order.len() - 1
        })
    }

    fn claim(&mut self, id: RowId, key: String) {
        let slot = self.register(id);
        self.order[slot].1.push(key);
    }
}

/// Scans the selected cells of every sheet and splits rows into
/// representatives and duplicates.
pub struct DedupEngine<'a> {
    normalizer: &'a Normalizer,
    options: &'a ProcessingOptions,
}

impl<'a> DedupEngine<'a> {
    pub fn new(normalizer: &'a Normalizer, options: &'a ProcessingOptions) -> Self {
        Self { normalizer, options }
    }

    /// Sheets are visited in input order, rows in row order and columns in
    /// selection order; the first cell to produce a value owns it.
    pub fn process(&self, sheets: &[Sheet], selection: &ColumnSelection) -> EngineOutput {
        if !selection.selects_any(sheets) {
            tracing::debug!("No columns selected, nothing to deduplicate");
            return EngineOutput::default();
        }

        let mut tracker = OccurrenceTracker::new();
        let mut representatives = Representatives::default();
        let mut duplicates = Vec::new();
        let mut stats = EngineStats::default();

        for (sheet_index, sheet) in sheets.iter().enumerate() {
            let columns = selection.columns_for(&sheet.name);
            tracing::debug!(
                "Scanning sheet '{}': {} rows, {} selected columns",
                sheet.name,
                sheet.rows.len(),
                columns.len()
            );

            for (row_index, row) in sheet.rows.iter().enumerate() {
                if self.options.remove_empty_rows && row.is_blank() {
                    stats.empty_rows_removed += 1;
                    continue;
                }
                stats.rows_scanned += 1;

                let id = RowId {
                    sheet: sheet_index,
                    row: row_index,
                };
                let mut tracked = false;

                for column in columns {
                    let Some(key) = self.normalizer.normalize(row.get(column)) else {
                        stats.cells_skipped += 1;
                        continue;
                    };
                    stats.cells_checked += 1;
                    tracked = true;

                    let location = Location::new(&sheet.name, column, row_index);
                    let observation = tracker.observe(key.clone(), location.clone());

                    if observation.is_first {
                        representatives.claim(id, key);
                    } else if self.options.remove_duplicates {
                        duplicates.push(DuplicateEntry {
                            row: row.clone(),
                            value: key,
                            original: observation.first_location,
                            current: location,
                            occurrence: observation.occurrence,
                        });
                    }
                }

                if !tracked && self.options.keep_untracked_rows {
                    representatives.register(id);
                }
            }
        }

        let clean_rows: Vec<CleanRow> = representatives
            .order
            .into_iter()
            .map(|(id, keys)| {
                let sheet = &sheets[id.sheet];
                let locations = keys
                    .iter()
                    .filter_map(|key| tracker.get(key))
                    .flat_map(|record| record.locations.iter().cloned())
                    .collect();
                CleanRow {
                    row: sheet.rows[id.row].clone(),
                    sheet_name: sheet.name.clone(),
                    locations,
                }
            })
            .collect();

        stats.distinct_values = tracker.len();
        stats.repeated_values = tracker.repeated_values();

        tracing::info!(
            "Deduplication finished: {} cells checked, {} distinct values, {} duplicates, {} clean rows",
            stats.cells_checked,
            stats.distinct_values,
            duplicates.len(),
            clean_rows.len()
        );

        EngineOutput {
            clean_rows,
            duplicates,
            stats,
        }
    }
}
