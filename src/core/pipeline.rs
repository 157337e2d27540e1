use crate::core::extractor::{CardExtractor, ExtractionSettings};
use crate::core::input::{backup_path, read_text, sibling_path};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ExportDocument, ExtractionReport, JobApplication, TransformResult};
use crate::utils::error::{EtlError, Result};
use chrono::{Local, NaiveDateTime};

/// HTML 匯出檔 -> ExportDocument JSON
pub struct IndeedPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    settings: ExtractionSettings,
    input: String,
    now: NaiveDateTime,
}

impl<S: Storage, C: ConfigProvider> IndeedPipeline<S, C> {
    pub fn new(storage: S, config: C, settings: ExtractionSettings, input: String) -> Self {
        Self {
            storage,
            config,
            settings,
            input,
            now: Local::now().naive_local(),
        }
    }

    /// 固定參考時間，相對日期與 meta 時間戳都以此為準
    pub fn with_clock(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    fn wants_format(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

/// Html 不是 Send，整個解析過程留在同步函式內
fn extract_applications(
    settings: &ExtractionSettings,
    html: &str,
    now: NaiveDateTime,
) -> Result<ExtractionReport> {
    let extractor = CardExtractor::from_settings(settings)?;
    Ok(extractor.extract_html(html, now))
}

fn render_delimited(applications: &[JobApplication], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    for application in applications {
        writer.serialize(application)?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush delimited output: {}", e),
    })?;

    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("Delimited output is not UTF-8: {}", e),
    })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for IndeedPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractionReport> {
        let html = read_text(&self.storage, &self.input).await.map_err(|e| {
            tracing::error!("❌ Error loading HTML from {}: {}", self.input, e);
            e
        })?;
        tracing::info!("📄 Successfully loaded HTML from: {}", self.input);

        extract_applications(&self.settings, &html, self.now)
    }

    async fn transform(&self, report: ExtractionReport) -> Result<TransformResult> {
        if report.applications.is_empty() {
            tracing::error!("❌ No applications extracted from {}", self.input);
            return Err(EtlError::NoRecordsExtracted {
                path: self.input.clone(),
            });
        }

        let stats = report.stats;
        let document =
            ExportDocument::new(report.applications, self.config.source_label(), self.now);

        let csv_output = if self.wants_format("csv") {
            Some(render_delimited(&document.applications, b',')?)
        } else {
            None
        };
        let tsv_output = if self.wants_format("tsv") {
            Some(render_delimited(&document.applications, b'\t')?)
        } else {
            None
        };

        tracing::info!(
            "🔧 Built export document with {} entries",
            document.meta.total_entries
        );

        Ok(TransformResult {
            document,
            csv_output,
            tsv_output,
            stats,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path().to_string();

        if self.config.backup_enabled() && self.storage.exists(&output_path).await {
            let backup = backup_path(&output_path, self.now);
            match self.storage.copy_file(&output_path, &backup).await {
                Ok(()) => tracing::info!("🗂️ Created backup: {}", backup),
                Err(e) => tracing::warn!("⚠️ Could not create backup: {}", e),
            }
        }

        let json_data = serde_json::to_string_pretty(&result.document)?;
        self.storage
            .write_file(&output_path, json_data.as_bytes())
            .await?;
        tracing::info!("💾 Data saved to: {}", output_path);

        for (extension, output) in [("csv", &result.csv_output), ("tsv", &result.tsv_output)] {
            if let Some(content) = output {
                let path = sibling_path(&output_path, extension);
                self.storage.write_file(&path, content.as_bytes()).await?;
                tracing::info!("💾 {} view saved to: {}", extension.to_uppercase(), path);
            }
        }

        Ok(output_path)
    }
}
