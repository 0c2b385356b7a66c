pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::options::{ColumnSelection, ExportLayout, PatternPolicy, ProcessingOptions, ReplacementRule};
pub use config::toml_config::TomlConfig;

pub use crate::core::engine::DedupEngine;
pub use crate::core::normalizer::Normalizer;
pub use crate::core::tracker::OccurrenceTracker;
pub use crate::core::{etl::PipelineRunner, pipeline::process_sheets, pipeline::CleanPipeline};
pub use utils::error::{CleanError, Result};
