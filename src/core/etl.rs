use crate::config::toml_config::SummaryConfig;
use crate::core::summary::{self, ApplicationSummary};
use crate::core::Pipeline;
use crate::domain::model::{ExtractionStats, TransformResult};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub total_entries: usize,
    pub stats: ExtractionStats,
    pub applications: ApplicationSummary,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    summary: SummaryConfig,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            summary: SummaryConfig::default(),
        }
    }

    pub fn with_summary(mut self, summary: SummaryConfig) -> Self {
        self.summary = summary;
        self
    }

    fn summarize(&self, transformed: &TransformResult) -> ApplicationSummary {
        summary::summarize(
            &transformed.document.applications,
            self.summary.location.as_deref(),
            self.summary.top_n,
        )
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🚀 Starting Indeed application data extraction");

        let transformed = self.extract_and_transform().await?;
        let stats = transformed.stats;
        let total_entries = transformed.document.meta.total_entries;
        let applications = self.summarize(&transformed);

        tracing::info!("💾 Loading data...");
        let output_path = self.pipeline.load(transformed).await?;

        log_stats(&stats);
        summary::log_summary(&applications);
        tracing::info!("✅ Successfully extracted {} applications", total_entries);

        Ok(RunSummary {
            output_path,
            total_entries,
            stats,
            applications,
        })
    }

    /// 只執行 extract 與 transform，不寫入任何檔案
    pub async fn dry_run(&self) -> Result<TransformResult> {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        let transformed = self.extract_and_transform().await?;
        log_stats(&transformed.stats);
        summary::log_summary(&self.summarize(&transformed));
        Ok(transformed)
    }

    async fn extract_and_transform(&self) -> Result<TransformResult> {
        tracing::info!("📥 Extracting data...");
        let report = self.pipeline.extract().await?;
        tracing::info!(
            "📊 Extracted {} of {} cards",
            report.stats.successful,
            report.stats.total_cards
        );

        tracing::info!("🔧 Transforming data...");
        self.pipeline.transform(report).await
    }
}

pub fn log_stats(stats: &ExtractionStats) {
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("EXTRACTION STATISTICS");
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("Total cards found: {}", stats.total_cards);
    tracing::info!("Successfully extracted: {}", stats.successful);
    tracing::info!("Warnings: {}", stats.warnings);
    tracing::info!("Errors: {}", stats.errors);
    tracing::info!("{}", "=".repeat(50));
}
