use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Could not find the Indeed HTML export. Checked paths: {}", candidates.join(", "))]
    InputNotFoundInCandidates { candidates: Vec<String> },

    #[error("Invalid CSS selector for '{field}' ({selector}): {reason}")]
    SelectorError {
        field: String,
        selector: String,
        reason: String,
    },

    #[error("Card {index} could not be extracted: {message}")]
    CardError { index: usize, message: String },

    #[error("No applications extracted from {path}")]
    NoRecordsExtracted { path: String },

    #[error("JSON is still invalid after repair (line {line}, column {column}): {message}")]
    JsonRepairError {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("'{path}' is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { path: String, offset: usize },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Extraction,
    Decode,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::SelectorError { .. } => ErrorCategory::Configuration,
            EtlError::InputNotFound { .. } | EtlError::InputNotFoundInCandidates { .. } => {
                ErrorCategory::Input
            }
            EtlError::CardError { .. }
            | EtlError::NoRecordsExtracted { .. }
            | EtlError::ProcessingError { .. } => ErrorCategory::Extraction,
            EtlError::SerializationError(_)
            | EtlError::JsonRepairError { .. }
            | EtlError::InvalidUtf8 { .. } => ErrorCategory::Decode,
            EtlError::IoError(_) | EtlError::CsvError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單張卡片失敗只會被略過
            EtlError::CardError { .. } => ErrorSeverity::Low,
            EtlError::NoRecordsExtracted { .. }
            | EtlError::JsonRepairError { .. }
            | EtlError::InvalidUtf8 { .. } => ErrorSeverity::Medium,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 對應嚴重程度的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InputNotFound { .. } | EtlError::InputNotFoundInCandidates { .. } => {
                "Save the Indeed 'My jobs' page as HTML and pass its path as the first argument"
            }
            EtlError::SelectorError { .. } => {
                "Check the [schema] selectors in the config file against the saved page markup"
            }
            EtlError::NoRecordsExtracted { .. } => {
                "The page markup may have changed; update the [schema] card selector"
            }
            EtlError::JsonRepairError { .. } | EtlError::SerializationError(_) => {
                "Fix the reported line by hand; only comments and trailing commas are repaired automatically"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            EtlError::InvalidUtf8 { .. } => {
                "Re-save the file with UTF-8 encoding; the file was left unchanged"
            }
            EtlError::CardError { .. } => "Inspect the card markup or relax [validation] rules",
            EtlError::IoError(_) | EtlError::CsvError(_) => {
                "Check file permissions and available disk space"
            }
            EtlError::ProcessingError { .. } => "Re-run with --verbose for details",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputNotFound { path } => {
                format!("Could not find the input file '{}'", path)
            }
            EtlError::InputNotFoundInCandidates { .. } => {
                "Could not find 'My jobs _ Indeed.html' in any of the default locations".to_string()
            }
            EtlError::NoRecordsExtracted { path } => {
                format!("No job applications were found in '{}'", path)
            }
            EtlError::JsonRepairError { line, column, .. } => {
                format!("The JSON file is invalid near line {}, column {}", line, column)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
