use crate::core::Storage;
use crate::utils::error::{EtlError, Result};
use chrono::NaiveDateTime;
use std::path::Path;

/// 決定輸入 HTML 路徑：明確指定者必須存在，否則取候選清單中第一個存在的檔案
pub async fn resolve_input<S: Storage>(
    storage: &S,
    explicit: Option<&str>,
    candidates: &[String],
) -> Result<String> {
    if let Some(path) = explicit {
        if storage.exists(path).await {
            return Ok(path.to_string());
        }
        tracing::error!("❌ Provided input file not found: {}", path);
        return Err(EtlError::InputNotFound {
            path: path.to_string(),
        });
    }

    for candidate in candidates {
        if storage.exists(candidate).await {
            tracing::debug!("Using input candidate: {}", candidate);
            return Ok(candidate.clone());
        }
    }

    tracing::error!("❌ Could not find the Indeed HTML export");
    tracing::error!("Checked paths: {:?}", candidates);
    Err(EtlError::InputNotFoundInCandidates {
        candidates: candidates.to_vec(),
    })
}

/// 讀取整個檔案並以 UTF-8 解碼；無效位元組不做替換，直接回報位置
pub async fn read_text<S: Storage>(storage: &S, path: &str) -> Result<String> {
    let bytes = storage.read_file(path).await?;
    String::from_utf8(bytes).map_err(|e| EtlError::InvalidUtf8 {
        path: path.to_string(),
        offset: e.utf8_error().valid_up_to(),
    })
}

/// `data/apps.json` -> `data/apps.backup_20250112_093000.json`
pub fn backup_path(output: &str, now: NaiveDateTime) -> String {
    let path = Path::new(output);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());
    let name = format!("{}.backup_{}.{}", stem, now.format("%Y%m%d_%H%M%S"), extension);

    path.with_file_name(name).to_string_lossy().into_owned()
}

/// 同名但不同副檔名的輸出檔
pub fn sibling_path(output: &str, extension: &str) -> String {
    Path::new(output)
        .with_extension(extension)
        .to_string_lossy()
        .into_owned()
}
