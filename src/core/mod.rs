pub mod assembler;
pub mod engine;
pub mod etl;
pub mod normalizer;
pub mod pipeline;
pub mod tracker;

pub use crate::domain::model::{CellValue, Row, Sheet};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::domain::result::{CleanOutput, ProcessedResult, RunSummary};
pub use crate::utils::error::Result;
