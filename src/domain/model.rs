use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOURCE: &str = "Indeed Application History (HTML Extract)";

/// 單張卡片擷取出的求職紀錄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: usize,
    pub title: String,
    pub company: String,
    pub location: String,
    pub status: String,
    pub date_applied: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub export_date: NaiveDate,
    pub source: String,
    pub total_entries: usize,
    pub creation_timestamp: NaiveDateTime,
    pub extractor_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub meta: ExportMeta,
    pub applications: Vec<JobApplication>,
}

impl ExportDocument {
    /// `total_entries` 一律由 `applications` 長度推得
    pub fn new(applications: Vec<JobApplication>, source: &str, now: NaiveDateTime) -> Self {
        Self {
            meta: ExportMeta {
                export_date: now.date(),
                source: source.to_string(),
                total_entries: applications.len(),
                creation_timestamp: now,
                extractor_version: env!("CARGO_PKG_VERSION").to_string(),
            },
            applications,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub total_cards: usize,
    pub successful: usize,
    pub warnings: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    pub applications: Vec<JobApplication>,
    pub stats: ExtractionStats,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub document: ExportDocument,
    pub csv_output: Option<String>,
    pub tsv_output: Option<String>,
    pub stats: ExtractionStats,
}
