use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Malformed input: field '{field}' {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Pattern compilation failed: {0}")]
    PatternError(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DomError {
    pub fn malformed(field: &str, reason: impl Into<String>) -> Self {
        DomError::MalformedInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DomError::MalformedInput { .. } | DomError::SerializationError(_) => {
                ErrorCategory::Input
            }
            DomError::ConfigValidationError { .. }
            | DomError::InvalidConfigValueError { .. }
            | DomError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DomError::IoError(_) | DomError::PatternError(_) => ErrorCategory::System,
            DomError::CsvError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DomError::MalformedInput { .. } => ErrorSeverity::High,
            DomError::ConfigValidationError { .. }
            | DomError::InvalidConfigValueError { .. }
            | DomError::MissingConfigError { .. } => ErrorSeverity::High,
            DomError::SerializationError(_) | DomError::CsvError(_) => ErrorSeverity::Medium,
            DomError::IoError(_) | DomError::PatternError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DomError::MalformedInput { .. } => {
                "Each document must be an object with string 'title' and 'content' fields"
            }
            DomError::SerializationError(_) => "Check that the input file is valid JSON",
            DomError::ConfigValidationError { .. } | DomError::InvalidConfigValueError { .. } => {
                "Review the extraction config values against the documented ranges"
            }
            DomError::MissingConfigError { .. } => "Add the missing key to the extraction config",
            DomError::IoError(_) => "Check that the path exists and is readable/writable",
            DomError::CsvError(_) => "Try --format json or a different output path",
            DomError::PatternError(_) => "A built-in extraction pattern failed to compile; report this as a bug",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DomError::MalformedInput { field, .. } => {
                format!("輸入文件格式錯誤 ({}): {}", field, self)
            }
            DomError::IoError(e) => format!("無法讀寫檔案: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomError>;
