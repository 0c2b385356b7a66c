use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// Drives a pipeline through extract, transform and load.
pub struct PipelineRunner<P: Pipeline> {
    pipeline: P,
    monitoring: bool,
}

impl<P: Pipeline> PipelineRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitoring: false,
        }
    }

    /// Also samples CPU and memory after each phase.
    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self { pipeline, monitoring }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = RunMonitor::new(self.monitoring);
        tracing::info!("🚀 Starting cleanup run");

        tracing::info!("📥 Extracting sheets...");
        let sheets = self.pipeline.extract().await?;
        let total_rows: usize = sheets.iter().map(|s| s.rows.len()).sum();
        tracing::info!("📥 Extracted {} sheet(s), {} rows", sheets.len(), total_rows);
        monitor.end_phase("extract");

        tracing::info!("🧹 Normalizing and deduplicating...");
        let output = self.pipeline.transform(sheets).await?;
        tracing::info!(
            "🧹 {} clean rows, {} duplicates",
            output.result.clean.total_rows(),
            output.result.duplicate_count
        );
        monitor.end_phase("transform");

        tracing::info!("💾 Writing export...");
        let output_path = self.pipeline.load(output).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        monitor.end_phase("load");

        if self.monitoring {
            monitor.log_final_stats();
        }

        Ok(output_path)
    }
}
