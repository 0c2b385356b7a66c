use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Input is {size} bytes, limit is {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },

    #[error("No columns selected for processing")]
    NothingSelected,

    #[error("Lowercase and uppercase conversion cannot both be enabled")]
    CaseConflict,

    #[error("Invalid replacement pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CleanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanError::ConfigError { .. }
            | CleanError::ConfigValidationError { .. }
            | CleanError::InvalidConfigValueError { .. }
            | CleanError::MissingConfigError { .. }
            | CleanError::CaseConflict
            | CleanError::InvalidPattern { .. } => ErrorCategory::Configuration,
            CleanError::InvalidInput { .. }
            | CleanError::InputTooLarge { .. }
            | CleanError::NothingSelected
            | CleanError::CsvError(_) => ErrorCategory::Input,
            CleanError::ProcessingError { .. } | CleanError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            CleanError::ZipError(_) | CleanError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CleanError::NothingSelected | CleanError::CaseConflict => ErrorSeverity::Medium,
            CleanError::IoError(_) | CleanError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CleanError::NothingSelected => "Select at least one column to check for duplicates",
            CleanError::CaseConflict => "Enable either lowercase or uppercase conversion, not both",
            CleanError::InvalidPattern { .. } => {
                "Fix the replacement pattern or set on_invalid_pattern = \"skip\""
            }
            CleanError::InputTooLarge { .. } => "Split the file or raise the input size limit",
            CleanError::InvalidInput { .. } | CleanError::CsvError(_) => {
                "Check that the file has a header row and at least one sheet with data"
            }
            CleanError::ConfigError { .. }
            | CleanError::ConfigValidationError { .. }
            | CleanError::InvalidConfigValueError { .. }
            | CleanError::MissingConfigError { .. } => "Review the configuration values",
            CleanError::IoError(_) | CleanError::ZipError(_) => {
                "Check file paths and write permissions for the output directory"
            }
            CleanError::SerializationError(_) | CleanError::ProcessingError { .. } => {
                "Re-run with --verbose and inspect the logs"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanError::NothingSelected => "No columns were selected for processing".to_string(),
            CleanError::InputTooLarge { limit, .. } => {
                format!("The file is larger than the {} MB limit", limit / (1024 * 1024))
            }
            CleanError::InvalidInput { message } => format!("The file contains no valid data: {}", message),
            CleanError::IoError(e) => format!("File access failed: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_errors_are_user_correctable() {
        assert_eq!(CleanError::NothingSelected.category(), ErrorCategory::Input);
        assert_eq!(CleanError::NothingSelected.severity(), ErrorSeverity::Medium);
        assert_eq!(CleanError::CaseConflict.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = CleanError::from(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("denied"));
    }

    #[test]
    fn test_input_too_large_message_uses_megabytes() {
        let err = CleanError::InputTooLarge {
            size: 20 * 1024 * 1024,
            limit: 10 * 1024 * 1024,
        };
        assert_eq!(err.user_friendly_message(), "The file is larger than the 10 MB limit");
    }
}
