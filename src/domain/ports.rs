use crate::config::options::{ColumnSelection, ExportLayout, ProcessingOptions};
use crate::domain::model::Sheet;
use crate::domain::result::CleanOutput;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn processing_options(&self) -> ProcessingOptions;
    fn column_selection(&self) -> ColumnSelection;
    fn export_layout(&self) -> ExportLayout;
    fn max_input_bytes(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Sheet>>;
    async fn transform(&self, sheets: Vec<Sheet>) -> Result<CleanOutput>;
    async fn load(&self, output: CleanOutput) -> Result<String>;
}
