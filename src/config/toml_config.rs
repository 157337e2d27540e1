use crate::core::extractor::{CompiledSchema, ExtractionSettings, FIELD_NAMES};
use crate::core::summary::DEFAULT_TOP_N;
use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_SOURCE;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 3] = ["json", "csv", "tsv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub schema: SchemaConfig,
    pub defaults: DefaultsConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// 未指定輸入檔時依序嘗試的相對路徑
    pub candidates: Vec<String>,
}

/// 邏輯欄位對應到 CSS selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub card: String,
    pub title: String,
    pub company_location: String,
    pub company_location_item: String,
    pub status: String,
    pub date: String,
    pub title_suffixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub title: String,
    pub company: String,
    pub location: String,
    pub status: String,
    pub date_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub required_fields: Vec<String>,
    pub max_title_length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub backup: bool,
    pub source: String,
}

/// 執行結束後記錄的統計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub top_n: usize,
    /// 另外計算地點包含此字串的回覆率
    pub location: Option<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            location: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "extract/My jobs _ Indeed.html".to_string(),
                "../My jobs _ Indeed.html".to_string(),
                "data/My jobs _ Indeed.html".to_string(),
                "My jobs _ Indeed.html".to_string(),
            ],
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            card: ".atw-AppCard".to_string(),
            title: ".atw-JobInfo-jobTitle".to_string(),
            company_location: ".atw-JobInfo-companyLocation".to_string(),
            company_location_item: "span".to_string(),
            status: ".atw-StatusTag-description".to_string(),
            date: r#"[data-testid="jobStatusDateShort"]"#.to_string(),
            title_suffixes: vec!["job description opens in a new window".to_string()],
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            title: "Unknown Title".to_string(),
            company: "Unknown Company".to_string(),
            location: "Unknown Location".to_string(),
            status: "Applied".to_string(),
            date_text: "today".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "data/indeed-applications.json".to_string(),
            formats: vec!["json".to_string()],
            backup: true,
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_one_of("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;
        validation::validate_non_empty_string("output.source", &self.output.source)?;
        self.validate_output_extension()?;

        for candidate in &self.input.candidates {
            validation::validate_path("input.candidates", candidate)?;
        }

        // selector 必須能被編譯
        CompiledSchema::compile(&self.schema)?;

        validation::validate_one_of(
            "validation.required_fields",
            &self.validation.required_fields,
            &FIELD_NAMES,
        )?;

        validation::validate_positive_number("summary.top_n", self.summary.top_n, 1)?;

        if let Some(max) = self.validation.max_title_length {
            validation::validate_positive_number("validation.max_title_length", max, 1)?;
        }

        Ok(())
    }

    /// CSV/TSV 檢視寫在 JSON 旁邊，副檔名相同會覆蓋 JSON 文件
    fn validate_output_extension(&self) -> Result<()> {
        let extension = Path::new(&self.output.path)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        if let Some(extension) = extension {
            if extension != "json" && self.output.formats.iter().any(|f| *f == extension) {
                return Err(EtlError::InvalidConfigValueError {
                    field: "output.path".to_string(),
                    value: self.output.path.clone(),
                    reason: format!(
                        "the {} view would overwrite the JSON document; use a .json path",
                        extension
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            schema: self.schema.clone(),
            defaults: self.defaults.clone(),
            validation: self.validation.clone(),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn input_candidates(&self) -> &[String] {
        &self.input.candidates
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn backup_enabled(&self) -> bool {
        self.output.backup
    }

    fn source_label(&self) -> &str {
        &self.output.source
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
