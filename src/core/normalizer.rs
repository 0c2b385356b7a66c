//! Canonical comparison keys for raw cells.
//!
//! Cells are coerced to text (optionally reformatting numbers and dates), then
//! run through trim, lowercase, uppercase and the custom substitution rules in
//! that fixed order.

use crate::config::options::{PatternPolicy, ProcessingOptions};
use crate::domain::model::{render_number, CellValue};
use crate::utils::error::{CleanError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    replacement: String,
}

/// Normalization settings with the replacement rules compiled once per run.
#[derive(Debug, Clone)]
pub struct Normalizer {
    trim_whitespace: bool,
    lowercase: bool,
    uppercase: bool,
    format_numbers: bool,
    format_dates: bool,
    rules: Vec<CompiledRule>,
}

impl Normalizer {
    /// Compiles the replacement rules. With `PatternPolicy::Skip` a bad pattern
    /// is dropped for the whole run; with `Abort` it fails here, before any
    /// value is normalized.
    pub fn new(options: &ProcessingOptions) -> Result<Self> {
        let mut rules = Vec::with_capacity(options.custom_replacements.len());
        for rule in &options.custom_replacements {
            match Regex::new(&rule.from) {
                Ok(pattern) => rules.push(CompiledRule {
                    pattern,
                    replacement: rule.to.clone(),
                }),
                Err(source) => match options.on_invalid_pattern {
                    PatternPolicy::Skip => {
                        tracing::warn!("Skipping replacement rule '{}': {}", rule.from, source);
                    }
                    PatternPolicy::Abort => {
                        return Err(CleanError::InvalidPattern {
                            pattern: rule.from.clone(),
                            source,
                        });
                    }
                },
            }
        }

        Ok(Self {
            trim_whitespace: options.trim_whitespace,
            lowercase: options.convert_to_lowercase,
            uppercase: options.convert_to_uppercase,
            format_numbers: options.format_numbers,
            format_dates: options.format_dates,
            rules,
        })
    }

    /// Number of replacement rules that compiled.
    pub fn active_rules(&self) -> usize {
        self.rules.len()
    }

    /// Canonical key for `value`, or `None` when the cell is empty and must
    /// not be tracked.
    pub fn normalize(&self, value: &CellValue) -> Option<String> {
        let mut text = self.coerce(value)?;

        if self.trim_whitespace {
            text = text.trim().to_string();
        }
        if self.lowercase {
            text = text.to_lowercase();
        }
        if self.uppercase {
            text = text.to_uppercase();
        }
        for rule in &self.rules {
            text = rule
                .pattern
                .replace_all(&text, rule.replacement.as_str())
                .into_owned();
        }

        Some(text)
    }

    /// Textual form of a cell before any string transformation.
    pub fn coerce(&self, value: &CellValue) -> Option<String> {
        match value {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                if self.format_numbers {
                    if let Some(n) = parse_number_text(s) {
                        return Some(render_number(n));
                    }
                }
                if self.format_dates {
                    if let Some(date) = parse_date_text(s) {
                        return Some(date.format("%Y-%m-%d").to_string());
                    }
                }
                Some(s.clone())
            }
            CellValue::Date(dt) if self.format_dates => Some(dt.format("%Y-%m-%d").to_string()),
            CellValue::Number(_) | CellValue::Date(_) => Some(value.to_string()),
        }
    }
}

/// One-shot form of [`Normalizer::normalize`].
pub fn normalize(value: &CellValue, options: &ProcessingOptions) -> Result<Option<String>> {
    Ok(Normalizer::new(options)?.normalize(value))
}

/// Accepts an optional sign, `,` thousands groups and a fractional part.
fn parse_number_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    let integer_part = unsigned.split('.').next().unwrap_or("");

    if integer_part.contains(',') {
        let mut groups = integer_part.split(',');
        let head_ok = groups
            .next()
            .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
        let tail_ok = groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()));
        if !(head_ok && tail_ok) {
            return None;
        }
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    if !cleaned.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}
