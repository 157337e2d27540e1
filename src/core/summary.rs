//! 求職紀錄統計：回覆率、地區回覆率、Top-N 分布與每月活動量

use crate::domain::model::JobApplication;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TOP_N: usize = 5;

/// 空白欄位在分布統計中的標籤
const UNKNOWN_LABEL: &str = "Unknown";

/// 只代表「已送出、尚無回應」的狀態
const SILENT_STATUSES: [&str; 3] = ["applied", "unknown", ""];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRate {
    pub query: String,
    pub matched: usize,
    pub response_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationSummary {
    pub total: usize,
    pub responded: usize,
    /// 百分比 (0-100)
    pub response_rate: f64,
    pub location_rate: Option<LocationRate>,
    pub top_statuses: Vec<(String, usize)>,
    pub top_companies: Vec<(String, usize)>,
    pub top_locations: Vec<(String, usize)>,
    pub top_titles: Vec<(String, usize)>,
    /// `YYYY-MM` 依時間排序
    pub monthly_activity: Vec<(String, usize)>,
}

pub fn is_response(status: &str) -> bool {
    let status = status.trim().to_lowercase();
    !SILENT_STATUSES.contains(&status.as_str())
}

/// 狀態不是 applied/unknown/空白 的比例，沒有資料時為 0
pub fn response_rate(applications: &[&JobApplication]) -> f64 {
    if applications.is_empty() {
        return 0.0;
    }

    let responded = applications
        .iter()
        .filter(|app| is_response(&app.status))
        .count();

    responded as f64 / applications.len() as f64 * 100.0
}

/// 只計算地點包含 `query` (不分大小寫) 的紀錄
pub fn location_rate(applications: &[JobApplication], query: &str) -> LocationRate {
    let needle = query.to_lowercase();
    let matched: Vec<&JobApplication> = applications
        .iter()
        .filter(|app| app.location.to_lowercase().contains(&needle))
        .collect();

    LocationRate {
        query: query.to_string(),
        matched: matched.len(),
        response_rate: response_rate(&matched),
    }
}

/// 依次數遞減取前 `n` 名；同次數保留首次出現的順序
pub fn top_n<F>(applications: &[JobApplication], key: F, n: usize) -> Vec<(String, usize)>
where
    F: Fn(&JobApplication) -> &str,
{
    let mut counts: Vec<(String, usize)> = Vec::new();

    for app in applications {
        let value = key(app).trim();
        let label = if value.is_empty() { UNKNOWN_LABEL } else { value };

        match counts.iter_mut().find(|(existing, _)| existing.as_str() == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

pub fn monthly_activity(applications: &[JobApplication]) -> Vec<(String, usize)> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for app in applications {
        *months
            .entry(app.date_applied.format("%Y-%m").to_string())
            .or_default() += 1;
    }
    months.into_iter().collect()
}

pub fn summarize(
    applications: &[JobApplication],
    location_query: Option<&str>,
    top: usize,
) -> ApplicationSummary {
    let all: Vec<&JobApplication> = applications.iter().collect();

    ApplicationSummary {
        total: applications.len(),
        responded: all.iter().filter(|app| is_response(&app.status)).count(),
        response_rate: response_rate(&all),
        location_rate: location_query
            .filter(|q| !q.trim().is_empty())
            .map(|q| location_rate(applications, q)),
        top_statuses: top_n(applications, |a| a.status.as_str(), top),
        top_companies: top_n(applications, |a| a.company.as_str(), top),
        top_locations: top_n(applications, |a| a.location.as_str(), top),
        top_titles: top_n(applications, |a| a.title.as_str(), top),
        monthly_activity: monthly_activity(applications),
    }
}

pub fn log_summary(summary: &ApplicationSummary) {
    tracing::info!("{}", "=".repeat(50));
    tracing::info!("APPLICATION SUMMARY");
    tracing::info!("{}", "=".repeat(50));
    tracing::info!(
        "Response rate: {:.1}% ({} of {})",
        summary.response_rate,
        summary.responded,
        summary.total
    );
    if let Some(rate) = &summary.location_rate {
        tracing::info!(
            "Response rate in '{}': {:.1}% ({} applications)",
            rate.query,
            rate.response_rate,
            rate.matched
        );
    }
    log_ranking("Top statuses", &summary.top_statuses);
    log_ranking("Top companies", &summary.top_companies);
    log_ranking("Top locations", &summary.top_locations);
    log_ranking("Top titles", &summary.top_titles);
    log_ranking("Monthly activity", &summary.monthly_activity);
    tracing::info!("{}", "=".repeat(50));
}

fn log_ranking(label: &str, entries: &[(String, usize)]) {
    let line = entries
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!("{}: {}", label, line);
}
