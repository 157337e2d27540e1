use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// 舊版擷取器留下、已不再使用的欄位
pub const OBSOLETE_FIELDS: [&str; 2] = ["original_date_text", "sub_status"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub applications: usize,
    pub records_touched: usize,
    pub fields_removed: usize,
}

/// 從每筆 application 移除指定欄位，並同步 `meta.total_entries`
pub fn clean(document: &mut Value, fields: &[String]) -> Result<CleanReport> {
    let applications = document
        .get_mut("applications")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| EtlError::ProcessingError {
            message: "document has no 'applications' array".to_string(),
        })?;

    let mut report = CleanReport {
        applications: applications.len(),
        ..Default::default()
    };

    for application in applications.iter_mut() {
        let Some(record) = application.as_object_mut() else {
            continue;
        };

        let removed = fields
            .iter()
            .filter(|field| record.shift_remove(field.as_str()).is_some())
            .count();

        if removed > 0 {
            report.records_touched += 1;
            report.fields_removed += removed;
        }
    }

    if let Some(total) = document
        .get_mut("meta")
        .and_then(|meta| meta.get_mut("total_entries"))
    {
        *total = Value::from(report.applications);
    }

    Ok(report)
}
